//! Message log widget.
//!
//! Renders messages, suggestion groups and notices, pinned to the newest
//! entry unless the user has scrolled back.

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use sitechat_engine::{LogEntry, Message, MessageLog, Segment, Sender, SuggestionGroup};
use std::ops::Range;
use textwrap::{Options, WordSeparator, WordSplitter};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

/// Indentation for message bodies.
const BODY_INDENT: &str = "  ";

/// Scrollable view over a [`MessageLog`].
pub struct MessageLogView<'a> {
    log: &'a MessageLog,
    theme: &'a Theme,
    /// Highlighted suggestion as (log index, choice index).
    cursor: Option<(usize, usize)>,
    /// Lines scrolled back from the bottom.
    scroll_back: usize,
    focused: bool,
}

impl<'a> MessageLogView<'a> {
    /// Create a new message log view.
    pub fn new(log: &'a MessageLog, theme: &'a Theme) -> Self {
        Self {
            log,
            theme,
            cursor: None,
            scroll_back: 0,
            focused: false,
        }
    }

    /// Highlight a suggestion.
    #[must_use]
    pub fn cursor(mut self, cursor: Option<(usize, usize)>) -> Self {
        self.cursor = cursor;
        self
    }

    /// Scroll back from the bottom by `lines`.
    #[must_use]
    pub fn scroll_back(mut self, lines: usize) -> Self {
        self.scroll_back = lines;
        self
    }

    /// Set whether this view is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Build all display lines for a given content width.
    pub fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        self.layout(width).0
    }

    /// Display lines plus the line holding the highlighted suggestion.
    fn layout(&self, width: usize) -> (Vec<Line<'static>>, Option<usize>) {
        let mut lines = Vec::new();
        let mut cursor_line = None;
        for (index, entry) in self.log.entries().iter().enumerate() {
            match entry {
                LogEntry::Message(message) => self.push_message(&mut lines, message, width),
                LogEntry::Suggestions(group) => {
                    let cursor = self
                        .cursor
                        .filter(|(g, _)| *g == index)
                        .map(|(_, choice)| choice);
                    if cursor.is_some() && !group.is_empty() {
                        cursor_line = Some(lines.len());
                    }
                    self.push_suggestions(&mut lines, group, cursor, width);
                }
                LogEntry::Notice(text) => {
                    lines.push(Line::from(Span::styled(
                        format!("! {text}"),
                        Style::default().fg(self.theme.error),
                    )));
                    lines.push(Line::default());
                }
            }
        }
        (lines, cursor_line)
    }

    fn push_message(&self, lines: &mut Vec<Line<'static>>, message: &Message, width: usize) {
        let (name, color) = match message.sender {
            Sender::Bot => ("Assistant", self.theme.bot),
            Sender::User => ("You", self.theme.user),
        };
        let time = message.timestamp.with_timezone(&Local).format("%H:%M");
        lines.push(Line::from(vec![
            Span::styled(name, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" {time}"), Style::default().fg(self.theme.muted)),
        ]));

        // Links are found on the whole text; wrapping only breaks at spaces
        // so a URL is split only when it is wider than the view.
        let text = message.text.as_str();
        let links = link_ranges(&message.segments());
        let options = Options::new(width.saturating_sub(BODY_INDENT.len()).max(1))
            .word_separator(WordSeparator::AsciiSpace)
            .word_splitter(WordSplitter::NoHyphenation);

        let mut consumed = 0;
        for wrapped in textwrap::wrap(text, options) {
            let start = text[consumed..]
                .find(wrapped.as_ref())
                .map_or(consumed, |offset| consumed + offset);
            let end = start + wrapped.len();
            consumed = end;

            let mut spans = vec![Span::raw(BODY_INDENT)];
            let mut pos = start;
            for link in links.iter().filter(|l| l.start < end && l.end > start) {
                if link.start > pos {
                    spans.push(Span::styled(text[pos..link.start].to_string(), self.theme.body()));
                }
                let link_end = link.end.min(end);
                spans.push(Span::styled(
                    text[pos.max(link.start)..link_end].to_string(),
                    self.theme.link(),
                ));
                pos = link_end;
            }
            if pos < end {
                spans.push(Span::styled(text[pos..end].to_string(), self.theme.body()));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::default());
    }

    fn push_suggestions(
        &self,
        lines: &mut Vec<Line<'static>>,
        group: &SuggestionGroup,
        cursor: Option<usize>,
        width: usize,
    ) {
        if group.is_empty() {
            return;
        }

        let mut row: Vec<Span<'static>> = vec![Span::raw(BODY_INDENT)];
        let mut row_width = BODY_INDENT.len();

        for (i, suggestion) in group.suggestions.iter().enumerate() {
            let chip = format!("[ {} ]", suggestion.label);
            let chip_width = chip.width() + 1;

            if row_width + chip_width > width && row.len() > 1 {
                lines.push(Line::from(std::mem::take(&mut row)));
                row.push(Span::raw(BODY_INDENT));
                row_width = BODY_INDENT.len();
            }

            let mut style = if suggestion.selected {
                Style::default()
                    .fg(self.theme.success)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.secondary)
            };
            if cursor == Some(i) {
                style = style.add_modifier(Modifier::REVERSED);
            }

            row.push(Span::styled(chip, style));
            row.push(Span::raw(" "));
            row_width += chip_width;
        }

        lines.push(Line::from(row));
        lines.push(Line::default());
    }
}

/// Byte ranges of the link segments in the text they were split from.
fn link_ranges(segments: &[Segment<'_>]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut offset = 0;
    for segment in segments {
        let len = segment.as_str().len();
        if matches!(segment, Segment::Link(_)) {
            ranges.push(offset..offset + len);
        }
        offset += len;
    }
    ranges
}

impl Widget for MessageLogView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        };

        let block = Block::default()
            .title(" Chat ")
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let (lines, cursor_line) = self.layout(inner.width as usize);
        let height = inner.height as usize;
        let mut offset = lines
            .len()
            .saturating_sub(height)
            .saturating_sub(self.scroll_back);
        // Keep the highlighted suggestions on screen unless the user scrolled away.
        if let Some(line) = cursor_line.filter(|_| self.scroll_back == 0) {
            if line < offset {
                offset = line;
            }
        }

        Paragraph::new(lines)
            .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0))
            .render(inner, buf);
    }
}
