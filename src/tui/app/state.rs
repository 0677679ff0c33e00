//! TUI state container
//!
//! Holds the controller and the effect runtime together with the few bits of
//! state that only exist in the terminal: which control has focus and which
//! consultant row the list cursor is on.

use capdir_core::controller::{Action, DirectoryController};
use capdir_core::render::{UnregisterBinding, View};
use capdir_core::runtime::Runtime;

/// Tab order of the controls, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Practice,
    Industry,
    Availability,
    Sort,
    List,
    Email,
    Capability,
}

impl Focus {
    const ORDER: [Focus; 8] = [
        Focus::Search,
        Focus::Practice,
        Focus::Industry,
        Focus::Availability,
        Focus::Sort,
        Focus::List,
        Focus::Email,
        Focus::Capability,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Focus {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Focus {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }

    /// Controls that take typed characters.
    pub fn is_text(self) -> bool {
        matches!(self, Focus::Search | Focus::Email)
    }
}

pub struct App {
    pub controller: DirectoryController,
    pub runtime: Runtime,
    pub focus: Focus,
    /// Index into the current view's unregister bindings.
    pub list_cursor: usize,
    /// Recent debug log entries replace the card list while set.
    pub show_logs: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: DirectoryController, runtime: Runtime) -> Self {
        Self {
            controller,
            runtime,
            focus: Focus::Search,
            list_cursor: 0,
            show_logs: false,
            should_quit: false,
        }
    }

    /// Issue the initial fetch.
    pub fn start(&mut self) {
        let effects = self.controller.start();
        self.runtime.run_all(effects);
    }

    pub fn view(&self) -> &View {
        self.controller.view()
    }

    /// Dispatch through the runtime and keep the list cursor on a row that
    /// still exists after the re-render.
    pub fn dispatch(&mut self, action: Action) {
        self.runtime.dispatch(&mut self.controller, action);
        self.clamp_cursor();
    }

    pub fn clamp_cursor(&mut self) {
        let rows = self.view().bindings().count();
        if rows == 0 {
            self.list_cursor = 0;
        } else if self.list_cursor >= rows {
            self.list_cursor = rows - 1;
        }
    }

    pub fn move_cursor(&mut self, down: bool) {
        let rows = self.view().bindings().count();
        if rows == 0 {
            return;
        }
        self.list_cursor = if down {
            (self.list_cursor + 1).min(rows - 1)
        } else {
            self.list_cursor.saturating_sub(1)
        };
    }

    /// The binding under the cursor in the view currently on screen.
    pub fn selected_binding(&self) -> Option<&UnregisterBinding> {
        self.view().bindings().nth(self.list_cursor)
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycles_both_ways() {
        let mut focus = Focus::Search;
        for _ in 0..Focus::ORDER.len() {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::Search);
        assert_eq!(Focus::Search.prev(), Focus::Capability);
        assert_eq!(Focus::Sort.next(), Focus::List);
    }
}
