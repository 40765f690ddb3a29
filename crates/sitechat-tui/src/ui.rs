//! Screen composition for the sitechat TUI.
//!
//! ```text
//!  ✓ Website type ─ ● Background ─ ○ Main colour ─ ○ Details
//! ┌─ Chat ─────────────────────────────────────────────────┐
//! │Assistant 14:02                                         │
//! │  Please select the background theme of your website.   │
//! │  [ Dark-Mode ] [ Light-Mode ]                          │
//! └────────────────────────────────────────────────────────┘
//! ┌─ Choose ───────────────────────────────────────────────┐
//! │←/→ choose · ↑/↓ earlier choices · Enter select · 1-9 qu│
//! └────────────────────────────────────────────────────────┘
//! ● Step 2/4 │ http://127.0.0.1:5000 │ → F1 help · Esc quit
//! ```

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use crate::app::{App, Focus};
use crate::theme::Theme;
use crate::widgets::{InputBar, MessageLogView, StatusBar, StepperBar};

/// Height of the input bar including borders.
const INPUT_HEIGHT: u16 = 3;

/// Render the whole screen.
pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let theme = Theme::default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    let widget = &app.widget;
    let focus = app.focus();

    StepperBar::new(widget.stepper(), &theme).render(chunks[0], buf);

    MessageLogView::new(widget.log(), &theme)
        .cursor(app.cursor())
        .scroll_back(app.scroll_back)
        .focused(focus == Focus::Log)
        .render(chunks[1], buf);

    InputBar::new(&app.input, &theme)
        .mode(widget.input_mode())
        .target(widget.submit_target())
        .focused(focus == Focus::Input)
        .loading(widget.is_loading(), app.tick)
        .render(chunks[2], buf);

    StatusBar::new(&app.status_content(), &theme).render(chunks[3], buf);

    if app.show_help {
        render_help_overlay(area, buf, &theme);
    }
}

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer, theme: &Theme) {
    let help_text = r"
  Choosing
    Left/Right        Move between suggestions
    Up/Down           Earlier / later suggestion groups
    1-9               Pick a suggestion directly
    Enter             Pick / send message

  Anywhere
    Tab               Switch between chat and input
    PgUp/PgDn         Scroll the chat
    F1                Toggle this help
    Esc, Ctrl+C       Quit

  [Press any key to close]
";

    let width = 52.min(area.width.saturating_sub(4));
    let height = 17.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Style::default().fg(theme.text))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.base));

    Paragraph::new(help_text)
        .block(block)
        .style(Style::default().fg(theme.text))
        .render(overlay_area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, render_app, TEST_HEIGHT, TEST_WIDTH};

    #[test]
    fn test_initial_screen() {
        let app = create_test_app();
        let screen = render_app(&app, TEST_WIDTH, TEST_HEIGHT);
        assert!(screen.contains("● Website type"));
        assert!(screen.contains("Welcome! What type of website"));
        assert!(screen.contains("[ Portfolio/CV ]"));
        assert!(screen.contains("[ Landing Page ]"));
        assert!(screen.contains("Step 1/4"));
    }

    #[test]
    fn test_help_overlay_drawn_on_top() {
        let mut app = create_test_app();
        app.show_help = true;
        let screen = render_app(&app, TEST_WIDTH, TEST_HEIGHT);
        assert!(screen.contains("Toggle this help"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut app = create_test_app();
        app.show_help = true;
        render_app(&app, 10, 4);
    }

    #[test]
    fn test_centered_fixed_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_fixed(40, 4, area);
        assert_eq!(rect.width, 20);
        assert_eq!(rect.y, 3);
    }
}
