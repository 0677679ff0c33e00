//! Interactive directory
//!
//! Architecture:
//! - App: controller plus focus and list cursor
//! - Event loop: keys become controller actions, completed effects come
//!   back over the runtime channel, and every iteration redraws the view
//! - UI: search box, filter pickers, capability cards, registration form

use crate::tui::app::App;
use crate::tui::event_loop::{handle_key_event, LoopAction};
use capdir_core::config::Config;
use capdir_core::controller::{Action, DirectoryController};
use capdir_core::registry::RegistryClient;
use capdir_core::runtime::Runtime;
use crossterm::event::{self, Event};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

pub mod app;
pub mod event_loop;
pub mod ui;

/// Main entry point for the interactive directory
pub async fn run_tui(config: &Config, client: RegistryClient) -> io::Result<()> {
    use crossterm::{
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use ratatui::{backend::CrosstermBackend, Terminal};

    let controller = DirectoryController::new(
        config.ui.default_sort_key(),
        config.ui.feedback_dismiss_after(),
    );
    let (runtime, rx) = Runtime::new(client);
    let mut app = App::new(controller, runtime);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start();
    let result = run_event_loop(&mut terminal, &mut app, rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main event loop
async fn run_event_loop<B: ratatui::backend::Backend>(
    terminal: &mut ratatui::Terminal<B>,
    app: &mut App,
    mut rx: mpsc::UnboundedReceiver<Action>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(16); // ~60 FPS

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        tokio::select! {
            _ = tokio::time::sleep(tick_rate) => {
                // Drain everything queued so a burst of keys is one redraw
                while event::poll(Duration::from_secs(0))? {
                    match event::read()? {
                        Event::Key(key) => match handle_key_event(app, key) {
                            LoopAction::Continue => {}
                            LoopAction::Break => return Ok(()),
                        },
                        Event::Resize(_, _) => {}
                        _ => {}
                    }
                }
            }

            // Completed fetches, mutations and dismiss timers
            action = rx.recv() => {
                match action {
                    Some(action) => app.dispatch(action),
                    None => return Ok(()),
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
