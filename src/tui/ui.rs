use crate::tui::app::{App, Focus};
use capdir_core::feedback::FeedbackKind;
use capdir_core::logger;
use capdir_core::render::{CapabilityCard, NO_CONSULTANTS};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const ALL: &str = "All";

pub fn render(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_search(frame, app, main_layout[0]);
    render_filters(frame, app, main_layout[1]);
    render_list(frame, app, main_layout[2]);
    render_form(frame, app, main_layout[3]);
    render_bottom_bar(frame, app, main_layout[4]);
}

fn border_style(app: &App, focus: Focus) -> Style {
    if app.focus == focus {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Search ")
        .border_style(border_style(app, Focus::Search));
    let search = Paragraph::new(app.controller.criteria().search.as_str()).block(block);
    frame.render_widget(search, area);
}

fn render_filters(frame: &mut Frame, app: &App, area: Rect) {
    let criteria = app.controller.criteria();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
            Constraint::Percentage(30),
        ])
        .split(area);

    let pickers = [
        (" Practice Area ", Focus::Practice, criteria.practice_area.clone()),
        (" Industry ", Focus::Industry, criteria.industry.clone()),
        (
            " Availability ",
            Focus::Availability,
            criteria.availability.map(|a| a.as_str().to_string()),
        ),
        (" Sort ", Focus::Sort, Some(criteria.sort.label().to_string())),
    ];

    for ((title, focus, value), chunk) in pickers.into_iter().zip(chunks.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style(app, focus));
        let text = format!("< {} >", value.as_deref().unwrap_or(ALL));
        frame.render_widget(Paragraph::new(text).block(block), *chunk);
    }
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    if app.show_logs {
        render_logs(frame, area);
        return;
    }
    let view = app.view();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", view.summary))
        .border_style(border_style(app, Focus::List));

    if let Some(notice) = &view.notice {
        let text = Paragraph::new(notice.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(text, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut row = 0usize;
    let mut cursor_line = 0usize;
    for card in &view.cards {
        card_lines(app, card, &mut lines, &mut row, &mut cursor_line);
        lines.push(Line::from(""));
    }

    // Keep the selected consultant on screen
    let height = area.height.saturating_sub(2) as usize;
    let scroll = if app.focus == Focus::List && cursor_line >= height {
        (cursor_line + 1 - height) as u16
    } else {
        0
    };

    let list = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(list, area);
}

/// Newest entries at the bottom, as many as fit.
fn render_logs(frame: &mut Frame, area: Rect) {
    let height = area.height.saturating_sub(2) as usize;
    let mut logs = logger::get_recent_logs(height);
    logs.reverse();
    let text = if logs.is_empty() {
        "No logs found.".to_string()
    } else {
        logs.join("\n")
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Recent Logs (F2 to close) ")
        .border_style(Style::default().fg(Color::Magenta));
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn card_lines(
    app: &App,
    card: &CapabilityCard,
    lines: &mut Vec<Line<'static>>,
    row: &mut usize,
    cursor_line: &mut usize,
) {
    let label = Style::default().fg(Color::DarkGray);
    lines.push(Line::from(Span::styled(
        card.name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if !card.description.is_empty() {
        lines.push(Line::from(format!("  {}", card.description)));
    }
    lines.push(Line::from(vec![
        Span::styled("  Practice Area: ", label),
        Span::styled(card.practice_area.clone(), Style::default().fg(Color::Cyan)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  Industry Verticals: ", label),
        Span::raw(card.industries.clone()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  Capacity: ", label),
        Span::styled(card.capacity.clone(), Style::default().fg(Color::Green)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  Current Team: ", label),
        Span::raw(card.team.clone()),
    ]));

    if card.consultants.is_empty() {
        lines.push(Line::from(Span::styled(format!("    {}", NO_CONSULTANTS), label)));
        return;
    }

    for consultant in &card.consultants {
        let selected = app.focus == Focus::List && *row == app.list_cursor;
        if selected {
            *cursor_line = lines.len();
        }
        let (marker, style) = if selected {
            ("> ", Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        } else {
            ("  ", Style::default())
        };
        lines.push(Line::from(vec![
            Span::raw(format!("  {}", marker)),
            Span::styled(consultant.email.clone(), style),
            Span::styled("  [d] unregister", label),
        ]));
        *row += 1;
    }
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let form = app.controller.form();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let email_block = Block::default()
        .borders(Borders::ALL)
        .title(" Register: Email ")
        .border_style(border_style(app, Focus::Email));
    frame.render_widget(Paragraph::new(form.email.as_str()).block(email_block), chunks[0]);

    let capability = if form.capability.is_empty() {
        "Select a capability"
    } else {
        form.capability.as_str()
    };
    let capability_block = Block::default()
        .borders(Borders::ALL)
        .title(" Register: Capability ")
        .border_style(border_style(app, Focus::Capability));
    frame.render_widget(
        Paragraph::new(format!("< {} >", capability)).block(capability_block),
        chunks[1],
    );
}

fn render_bottom_bar(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.view();
    let mut spans = Vec::new();

    if view.pending {
        spans.push(Span::styled("Working... ", Style::default().fg(Color::Yellow)));
    }

    match &view.feedback {
        Some(message) => {
            let color = match message.kind {
                FeedbackKind::Success => Color::Green,
                FeedbackKind::Error => Color::Red,
            };
            spans.push(Span::styled(
                message.text.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }
        None => spans.push(Span::styled(
            "Tab: focus  ←/→: change  ↑/↓: select  d: unregister  Enter: register  ^R: reload  ^L: clear  F2: logs  Esc: quit",
            Style::default().fg(Color::DarkGray),
        )),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
