//! sitechat-tui: Terminal UI for the sitechat website-builder assistant
//!
//! This crate provides the TUI layer for sitechat, including:
//! - The chat view with suggestion chips and free-text input
//! - The step indicator and status bar
//! - Background relay of requests to the Dialogue Service
//! - Headless mode for testing and automation

mod app;
mod event;
pub mod headless;
mod relay;
#[cfg(test)]
pub mod test_utils;
mod theme;
mod ui;
pub mod widgets;

pub use app::{App, Focus};
pub use event::{Action, Event, EventHandler};
pub use relay::RelayTasks;
pub use sitechat_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use sitechat_engine::{Config, DialogueService};
use std::io::{self, stdout};
use std::sync::Arc;
use tracing::info;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application against `service`.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on exit.
pub async fn run_tui(
    config: Config,
    service: Arc<dyn DialogueService>,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    info!(server = %config.server_url, "starting conversation");

    // 4 Hz tick drives the loading spinner.
    let mut events = EventHandler::new(250);
    let mut relay = RelayTasks::new(service);

    let result = run_loop(&mut terminal, &mut app, &mut events, &mut relay).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    relay: &mut RelayTasks,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            ui::render(app, area, frame.buffer_mut());
        })?;

        if app.should_quit {
            return Ok(());
        }

        tokio::select! {
            event = events.next() => {
                let action = match event {
                    Some(Event::Key(key)) => event::key_to_action(key, app.focus()),
                    Some(Event::Mouse(mouse)) => match mouse.kind {
                        MouseEventKind::ScrollUp => Action::ScrollUp,
                        MouseEventKind::ScrollDown => Action::ScrollDown,
                        _ => Action::None,
                    },
                    Some(Event::Tick) => {
                        app.tick();
                        Action::None
                    }
                    // Terminal will handle resize automatically
                    Some(Event::Resize(_, _)) => Action::None,
                    None => return Ok(()),
                };
                if let Some(pending) = app.handle_action(action) {
                    relay.spawn(pending);
                }
            }
            Some(completed) = relay.next() => {
                app.apply(completed);
            }
        }
    }
}
