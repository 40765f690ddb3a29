//! Step indicator bar for the top of the screen.
//!
//! Format: `✓ Website type ─ ● Background ─ ○ Main colour ─ ○ Details`

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use sitechat_engine::{StepStatus, Stepper};

use crate::theme::Theme;

/// Renders a [`Stepper`] as a single line.
pub struct StepperBar<'a> {
    stepper: &'a Stepper,
    theme: &'a Theme,
}

impl<'a> StepperBar<'a> {
    /// Create a new stepper bar widget.
    pub fn new(stepper: &'a Stepper, theme: &'a Theme) -> Self {
        Self { stepper, theme }
    }

    fn marker(status: StepStatus) -> &'static str {
        match status {
            StepStatus::Completed => "✓ ",
            StepStatus::Active => "● ",
            StepStatus::Neutral => "○ ",
        }
    }

    fn style(&self, status: StepStatus) -> Style {
        match status {
            StepStatus::Completed => Style::default().fg(self.theme.success),
            StepStatus::Active => Style::default()
                .fg(self.theme.primary)
                .add_modifier(Modifier::BOLD),
            StepStatus::Neutral => Style::default().fg(self.theme.muted),
        }
    }
}

impl Widget for StepperBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::raw(" ")];
        for (i, (label, status)) in self.stepper.indicators().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ─ ", Style::default().fg(self.theme.border)));
            }
            let style = self.style(status);
            spans.push(Span::styled(Self::marker(status), style));
            spans.push(Span::styled(label.to_string(), style));
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

    fn render(stepper: &Stepper) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        StepperBar::new(stepper, &theme).render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_markers_follow_step() {
        let mut stepper = Stepper::new(vec!["One".into(), "Two".into(), "Three".into()]);
        stepper.set_step(2);
        let line = render(&stepper);
        assert!(line.contains("✓ One"));
        assert!(line.contains("● Two"));
        assert!(line.contains("○ Three"));
    }

    #[test]
    fn test_past_end_has_no_active_marker() {
        let mut stepper = Stepper::new(vec!["One".into(), "Two".into()]);
        stepper.set_step(7);
        assert!(!render(&stepper).contains('●'));
    }
}
