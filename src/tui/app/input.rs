//! Input handling: text fields and option pickers

use super::state::{App, Focus};
use capdir_core::controller::Action;
use capdir_core::query::{Availability, SortKey};

/// Step through `options` from the entry equal to `current`.
///
/// An unknown `current` starts from the first entry, so the first step
/// forward lands on the second.
fn step<T: PartialEq + Clone>(options: &[T], current: &T, forward: bool) -> Option<T> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let at = options.iter().position(|o| o == current).unwrap_or(0);
    let next = if forward { (at + 1) % len } else { (at + len - 1) % len };
    Some(options[next].clone())
}

/// "All" followed by every offered value.
fn with_all(values: &[String]) -> Vec<Option<String>> {
    std::iter::once(None)
        .chain(values.iter().cloned().map(Some))
        .collect()
}

impl App {
    pub fn type_char(&mut self, c: char) {
        match self.focus {
            Focus::Search => {
                let mut term = self.controller.criteria().search.clone();
                term.push(c);
                self.dispatch(Action::SetSearch(term));
            }
            Focus::Email => {
                let mut email = self.controller.form().email.clone();
                email.push(c);
                self.dispatch(Action::SetEmail(email));
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            Focus::Search => {
                let mut term = self.controller.criteria().search.clone();
                if term.pop().is_some() {
                    self.dispatch(Action::SetSearch(term));
                }
            }
            Focus::Email => {
                let mut email = self.controller.form().email.clone();
                if email.pop().is_some() {
                    self.dispatch(Action::SetEmail(email));
                }
            }
            _ => {}
        }
    }

    /// Move the focused picker one option left or right.
    pub fn cycle_picker(&mut self, forward: bool) {
        let view = self.view();
        let action = match self.focus {
            Focus::Practice => {
                let options = with_all(&view.practice_options);
                step(&options, &self.controller.criteria().practice_area, forward)
                    .map(Action::SetPracticeArea)
            }
            Focus::Industry => {
                let options = with_all(&view.industry_options);
                step(&options, &self.controller.criteria().industry, forward)
                    .map(Action::SetIndustry)
            }
            Focus::Availability => {
                let options: Vec<Option<Availability>> = std::iter::once(None)
                    .chain(Availability::ALL.into_iter().map(Some))
                    .collect();
                step(&options, &self.controller.criteria().availability, forward)
                    .map(Action::SetAvailability)
            }
            Focus::Sort => step(&SortKey::KNOWN, &self.controller.criteria().sort, forward)
                .map(Action::SetSort),
            Focus::Capability => {
                let options: Vec<String> = std::iter::once(String::new())
                    .chain(view.capability_options.iter().cloned())
                    .collect();
                step(&options, &self.controller.form().capability, forward)
                    .map(Action::SelectCapability)
            }
            _ => None,
        };
        if let Some(action) = action {
            self.dispatch(action);
        }
    }
}
