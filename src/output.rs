//! Output formatting for the one-shot commands
//!
//! Prints the directory listing, mutation outcomes and configuration using
//! colored output.

use capdir_core::config::Config;
use capdir_core::registry::Outcome;
use capdir_core::render::{CapabilityCard, View, NO_CONSULTANTS};
use console::Style;

/// Output formatter for CLI results
pub struct OutputFormatter {
    blue: Style,
    green: Style,
    yellow: Style,
    red: Style,
    bold: Style,
    dim: Style,
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self {
            blue: Style::new().blue(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            bold: Style::new().bold(),
            dim: Style::new().dim(),
        }
    }
}

impl OutputFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print the rendered listing with its summary line
    pub fn print_listing(&self, view: &View) {
        println!("{}", self.dim.apply_to(&view.summary));

        if let Some(notice) = &view.notice {
            println!();
            println!("{}", self.yellow.apply_to(notice));
            return;
        }

        for card in &view.cards {
            println!();
            for line in self.card_lines(card) {
                println!("{}", line);
            }
        }
    }

    fn card_lines(&self, card: &CapabilityCard) -> Vec<String> {
        let mut lines = vec![self.bold.apply_to(&card.name).to_string()];
        if !card.description.is_empty() {
            lines.push(format!("  {}", card.description));
        }
        lines.push(format!("  Practice Area: {}", self.blue.apply_to(&card.practice_area)));
        lines.push(format!("  Industry Verticals: {}", card.industries));
        lines.push(format!("  Capacity: {}", self.green.apply_to(&card.capacity)));
        lines.push(format!("  Current Team: {}", card.team));

        if card.consultants.is_empty() {
            lines.push(format!("  {}", self.dim.apply_to(NO_CONSULTANTS)));
        } else {
            for row in &card.consultants {
                lines.push(format!("    - {}", row.email));
            }
        }
        lines
    }

    /// Print a register/unregister outcome
    pub fn print_outcome(&self, outcome: &Outcome) {
        match outcome {
            Outcome::Success { message } => println!("{}", self.green.apply_to(message)),
            Outcome::Failure { detail } => eprintln!("{}", self.red.apply_to(detail)),
        }
    }

    /// Print the effective configuration
    pub fn print_config(&self, config: &Config, source: Option<&std::path::Path>) {
        match source {
            Some(path) => println!("{} {}", self.bold.apply_to("Config file:"), path.display()),
            None => println!(
                "{} {}",
                self.bold.apply_to("Config file:"),
                self.dim.apply_to("none (using defaults)")
            ),
        }
        println!("Base URL: {}", self.green.apply_to(&config.backend.base_url));
        println!("Timeout: {}s", config.backend.timeout_secs);
        println!("Feedback shown for: {}s", config.ui.feedback_dismiss_secs);
        println!("Default sort: {}", config.ui.default_sort_key().label());
        println!("Log file: {}", config.logging.log_dir().join("debug.log").display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capdir_core::model::Snapshot;
    use capdir_core::query::Criteria;
    use capdir_core::render::{self, LoadState, RenderInput, NOT_SPECIFIED};

    fn listing(json: &str) -> View {
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        render::render(RenderInput {
            epoch: 0,
            snapshot: &snapshot,
            criteria: &Criteria::default(),
            load_state: LoadState::Loaded,
            feedback: None,
            pending: false,
        })
    }

    #[test]
    fn test_card_lines_match_rendered_card() {
        console::set_colors_enabled(false);
        let view = listing(
            r#"{"Cloud": {"description": "Cloud migrations", "practice_area": "Tech", "capacity": 37.5, "consultants": ["a@x.com"]}}"#,
        );
        let lines = OutputFormatter::new().card_lines(&view.cards[0]);
        assert_eq!(
            lines,
            vec![
                "Cloud".to_string(),
                "  Cloud migrations".to_string(),
                "  Practice Area: Tech".to_string(),
                format!("  Industry Verticals: {}", NOT_SPECIFIED),
                "  Capacity: 37.5 hours/week available".to_string(),
                "  Current Team: 1 consultants".to_string(),
                "    - a@x.com".to_string(),
            ]
        );
    }

    #[test]
    fn test_card_lines_without_consultants() {
        console::set_colors_enabled(false);
        let view = listing(r#"{"Audit": {"practice_area": "Fin", "capacity": 15, "industry_verticals": []}}"#);
        let lines = OutputFormatter::new().card_lines(&view.cards[0]);
        assert!(lines.contains(&"  Industry Verticals: ".to_string()));
        assert_eq!(lines.last().unwrap(), &format!("  {}", NO_CONSULTANTS));
    }
}
