//! Event Loop Module
//!
//! Maps keyboard events onto controller actions.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::tui::app::{App, Focus};
use capdir_core::controller::Action;

/// Action to take after handling an event
pub enum LoopAction {
    Continue,
    Break,
}

/// Handle key events
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> LoopAction {
    // Windows reports both press and release
    if key.kind == KeyEventKind::Release {
        return LoopAction::Continue;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global shortcuts
    match key.code {
        KeyCode::Esc => {
            app.should_quit = true;
            return LoopAction::Break;
        }
        KeyCode::Char('c') if ctrl => {
            app.should_quit = true;
            return LoopAction::Break;
        }
        KeyCode::Char('r') if ctrl => {
            app.dispatch(Action::Refresh);
            return LoopAction::Continue;
        }
        KeyCode::Char('l') if ctrl => {
            app.dispatch(Action::ClearFilters);
            return LoopAction::Continue;
        }
        KeyCode::F(2) => {
            app.show_logs = !app.show_logs;
            return LoopAction::Continue;
        }
        KeyCode::Tab => {
            app.focus_next();
            return LoopAction::Continue;
        }
        KeyCode::BackTab => {
            app.focus_prev();
            return LoopAction::Continue;
        }
        _ => {}
    }

    // Focus-specific handling
    let focus = app.focus;
    match focus {
        Focus::List => handle_list_focus(app, key),
        _ if focus.is_text() => handle_text_focus(app, key, ctrl),
        _ => handle_picker_focus(app, key),
    }
    LoopAction::Continue
}

fn handle_text_focus(app: &mut App, key: KeyEvent, ctrl: bool) {
    match key.code {
        KeyCode::Char(c) if !ctrl => app.type_char(c),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Enter if app.focus == Focus::Email => app.dispatch(Action::SubmitRegistration),
        KeyCode::Enter => app.focus_next(),
        _ => {}
    }
}

fn handle_picker_focus(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left => app.cycle_picker(false),
        KeyCode::Right | KeyCode::Char(' ') => app.cycle_picker(true),
        KeyCode::Enter if app.focus == Focus::Capability => {
            app.dispatch(Action::SubmitRegistration)
        }
        _ => {}
    }
}

fn handle_list_focus(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(true),
        KeyCode::Delete | KeyCode::Char('d') => {
            if let Some(binding) = app.selected_binding().cloned() {
                app.dispatch(Action::Unregister(binding));
            }
        }
        _ => {}
    }
}
