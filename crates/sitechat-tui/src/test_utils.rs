//! Test utilities for sitechat-tui rendering and integration tests.

use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use sitechat_engine::Config;

pub use sitechat_engine::testing::ScriptedService;

use crate::app::App;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Configuration with a fixed session id.
pub fn test_config() -> Config {
    Config {
        user_id: "test-user".into(),
        ..Config::default()
    }
}

/// Create a test app at the greeting.
pub fn create_test_app() -> App {
    App::new(&test_config())
}

/// Render the app into a test terminal and return its text.
pub fn render_app(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("Failed to create test terminal");
    terminal
        .draw(|frame| {
            let area = frame.area();
            crate::ui::render(app, area, frame.buffer_mut());
        })
        .expect("Failed to draw");
    buffer_to_string(terminal.backend().buffer())
}

/// Convert a buffer to text, one line per row, trailing spaces trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    crate::headless::buffer_to_string(buffer)
}
