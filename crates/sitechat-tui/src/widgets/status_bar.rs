//! Status bar widget for the bottom of the TUI.
//!
//! Format: `● Step 2/4 │ server │ preview /view_website (rev 1) │ → hint`

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

/// Status bar content.
#[derive(Debug, Clone, Default)]
pub struct StatusBarContent {
    /// Step summary (e.g., "Step 2/4").
    pub step: String,
    /// Dialogue Service address.
    pub server: String,
    /// Preview location and revision, once the site exists.
    pub preview: Option<String>,
    /// Next action hint (e.g., "q quit").
    pub hint: Option<String>,
}

/// Status bar widget.
pub struct StatusBar<'a> {
    content: &'a StatusBarContent,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar widget.
    pub fn new(content: &'a StatusBarContent, theme: &'a Theme) -> Self {
        Self { content, theme }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let separator = || Span::styled(" │ ", Style::default().fg(self.theme.muted));

        let mut spans = vec![
            Span::styled("● ", Style::default().fg(self.theme.primary)),
            Span::styled(&self.content.step, Style::default().fg(self.theme.text)),
            separator(),
            Span::styled(&self.content.server, Style::default().fg(self.theme.subtext)),
        ];

        if let Some(ref preview) = self.content.preview {
            spans.push(separator());
            spans.push(Span::styled(
                format!("preview {preview}"),
                Style::default().fg(self.theme.info),
            ));
        }

        if let Some(ref hint) = self.content.hint {
            spans.push(separator());
            spans.push(Span::styled(
                format!("→ {hint}"),
                Style::default().fg(self.theme.secondary),
            ));
        }

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(self.theme.surface))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn test_status_bar_renders_all_parts() {
        let content = StatusBarContent {
            step: "Step 2/4".into(),
            server: "http://127.0.0.1:5000".into(),
            preview: Some("/view_website (rev 1)".into()),
            hint: Some("Esc quit".into()),
        };
        let theme = Theme::default();
        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new(&content, &theme).render(area, &mut buf);

        let line = buffer_to_string(&buf);
        assert!(line.contains("● Step 2/4"));
        assert!(line.contains("http://127.0.0.1:5000"));
        assert!(line.contains("preview /view_website (rev 1)"));
        assert!(line.contains("→ Esc quit"));
    }

    #[test]
    fn test_preview_omitted_until_known() {
        let content = StatusBarContent {
            step: "Step 1/4".into(),
            server: "http://localhost".into(),
            ..StatusBarContent::default()
        };
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new(&content, &theme).render(area, &mut buf);
        assert!(!buffer_to_string(&buf).contains("preview"));
    }
}
