//! Input bar widget.
//!
//! Shows the free-text input once the conversation asks for it; before that
//! it shows how to pick a suggestion. While a request is in flight it shows
//! a loading indicator instead.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use sitechat_engine::{InputMode, SubmitTarget};

use crate::theme::Theme;
use crate::widgets::TextInputState;

/// Spinner frames for the loading indicator.
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Input bar at the bottom of the chat.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    theme: &'a Theme,
    mode: InputMode,
    target: SubmitTarget,
    focused: bool,
    loading: bool,
    tick: usize,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a TextInputState, theme: &'a Theme) -> Self {
        Self {
            input,
            theme,
            mode: InputMode::Buttons,
            target: SubmitTarget::Chat,
            focused: false,
            loading: false,
            tick: 0,
        }
    }

    /// Set the input mode.
    #[must_use]
    pub fn mode(mut self, mode: InputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set where submissions go (affects the title).
    #[must_use]
    pub fn target(mut self, target: SubmitTarget) -> Self {
        self.target = target;
        self
    }

    /// Set whether the input bar is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Set loading state and the animation tick.
    #[must_use]
    pub fn loading(mut self, loading: bool, tick: usize) -> Self {
        self.loading = loading;
        self.tick = tick;
        self
    }

    fn title(&self) -> &'static str {
        match (self.mode, self.target) {
            (InputMode::Buttons, _) => " Choose ",
            (InputMode::FreeText, SubmitTarget::Chat) => " Message ",
            (InputMode::FreeText, SubmitTarget::UpdateWebsite) => " Update website ",
        }
    }

    fn input_line(&self) -> Line<'static> {
        let prompt = Span::styled("> ", Style::default().fg(self.theme.primary));
        let text_style = Style::default().fg(self.theme.text);

        if self.input.is_empty() && !self.focused {
            return Line::from(vec![
                prompt,
                Span::styled("Type your answer...", Style::default().fg(self.theme.muted)),
            ]);
        }

        let chars: Vec<char> = self.input.content().chars().collect();
        let cursor = self.input.cursor.min(chars.len());
        let before: String = chars[..cursor].iter().collect();
        let after: String = chars[cursor..].iter().collect();

        let mut spans = vec![prompt, Span::styled(before, text_style)];
        if self.focused {
            spans.push(Span::styled("█", text_style));
        }
        spans.push(Span::styled(after, text_style));
        Line::from(spans)
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        };

        let block = Block::default()
            .title(self.title())
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(border_style);

        let paragraph = if self.loading {
            let frame = SPINNER[self.tick % SPINNER.len()];
            Paragraph::new(format!("{frame} Waiting for the assistant..."))
                .style(Style::default().fg(self.theme.warning))
        } else {
            match self.mode {
                InputMode::Buttons => Paragraph::new(
                    "←/→ choose · ↑/↓ earlier choices · Enter select · 1-9 quick pick",
                )
                .style(Style::default().fg(self.theme.subtext)),
                InputMode::FreeText => Paragraph::new(self.input_line()),
            }
        };

        paragraph.block(block).render(area, buf);
    }
}
