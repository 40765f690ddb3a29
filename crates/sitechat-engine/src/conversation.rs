//! Message log for the conversation widget.
//!
//! The log is append-only: messages, suggestion groups and notices are pushed
//! to the end and never edited or removed. The only mutable bit is the
//! `selected` flag on a suggestion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::linkify::{linkify, Segment};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person using the widget.
    User,
    /// The Dialogue Service.
    Bot,
}

/// A single message in the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Display text.
    pub text: String,
    /// Author of the message.
    pub sender: Sender,
    /// When the message was appended.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    /// Create a new bot message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot)
    }

    fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    /// Split the text into plain and link segments for rendering.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        linkify(&self.text)
    }
}

/// A selectable suggestion control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Label shown on the control and sent when it is chosen.
    pub label: String,
    /// Visual "selected" toggle.
    pub selected: bool,
}

/// A batch of suggestions rendered for one bot turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionGroup {
    /// Controls in display order.
    pub suggestions: Vec<Suggestion>,
}

impl SuggestionGroup {
    /// Build a group from labels.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suggestions: labels
                .into_iter()
                .map(|label| Suggestion {
                    label: label.into(),
                    selected: false,
                })
                .collect(),
        }
    }

    /// Number of controls in the group.
    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    /// Whether the group has no controls.
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }
}

/// An entry in the message log.
#[derive(Debug, Clone)]
pub enum LogEntry {
    /// A user or bot message.
    Message(Message),
    /// A group of suggestion controls.
    Suggestions(SuggestionGroup),
    /// A visible error notice (failed request).
    Notice(String),
}

/// Append-only log of conversation entries.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: Vec<LogEntry>,
    /// Index of the entry the view should keep visible.
    scroll_anchor: usize,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            scroll_anchor: 0,
        }
    }

    /// Append a message and scroll to it.
    pub fn append_message(&mut self, text: impl Into<String>, sender: Sender) {
        let message = match sender {
            Sender::User => Message::user(text),
            Sender::Bot => Message::bot(text),
        };
        self.push(LogEntry::Message(message));
    }

    /// Append a group of suggestion controls and scroll to it.
    ///
    /// Returns the index of the new group entry.
    pub fn render_suggestions<I, S>(&mut self, labels: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(LogEntry::Suggestions(SuggestionGroup::from_labels(labels)));
        self.entries.len() - 1
    }

    /// Append an error notice and scroll to it.
    pub fn append_notice(&mut self, text: impl Into<String>) {
        self.push(LogEntry::Notice(text.into()));
    }

    fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
        self.scroll_to_bottom();
    }

    /// Keep the newest entry visible.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_anchor = self.entries.len().saturating_sub(1);
    }

    /// Index of the entry the view keeps visible.
    pub fn scroll_anchor(&self) -> usize {
        self.scroll_anchor
    }

    /// All entries in order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over messages only.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().filter_map(|entry| match entry {
            LogEntry::Message(message) => Some(message),
            _ => None,
        })
    }

    /// The suggestion group at `index`, if that entry is one.
    pub fn suggestion_group(&self, index: usize) -> Option<&SuggestionGroup> {
        match self.entries.get(index) {
            Some(LogEntry::Suggestions(group)) => Some(group),
            _ => None,
        }
    }

    /// Index of the most recent suggestion group.
    pub fn latest_suggestion_group(&self) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|entry| matches!(entry, LogEntry::Suggestions(_)))
    }

    /// Flip the `selected` flag of a suggestion and return its label.
    pub(crate) fn toggle_suggestion(&mut self, group: usize, choice: usize) -> Option<String> {
        match self.entries.get_mut(group) {
            Some(LogEntry::Suggestions(g)) => {
                let suggestion = g.suggestions.get_mut(choice)?;
                suggestion.selected = !suggestion.selected;
                Some(suggestion.label.clone())
            }
            _ => None,
        }
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order_and_sender() {
        let mut log = MessageLog::new();
        log.append_message("hello", Sender::User);
        log.append_message("hi", Sender::Bot);

        let messages: Vec<_> = log.messages().collect();
        assert_eq!(log.len(), 2);
        assert_eq!(messages[0].text, "hello");
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[1].text, "hi");
        assert_eq!(messages[1].sender, Sender::Bot);
    }

    #[test]
    fn test_append_scrolls_to_newest() {
        let mut log = MessageLog::new();
        for i in 0..5 {
            log.append_message(format!("msg {i}"), Sender::Bot);
            assert_eq!(log.scroll_anchor(), i);
        }
    }

    #[test]
    fn test_empty_suggestions_render_inert_group() {
        let mut log = MessageLog::new();
        let index = log.render_suggestions(Vec::<String>::new());

        let group = log.suggestion_group(index).unwrap();
        assert!(group.is_empty());
        assert_eq!(log.toggle_suggestion(index, 0), None);
    }

    #[test]
    fn test_suggestion_groups_accumulate() {
        let mut log = MessageLog::new();
        let first = log.render_suggestions(["A", "B"]);
        let second = log.render_suggestions(["A", "B"]);

        assert_ne!(first, second);
        assert_eq!(log.latest_suggestion_group(), Some(second));
        assert_eq!(log.suggestion_group(first).unwrap().len(), 2);
    }

    #[test]
    fn test_toggle_suggestion_flips_only_that_control() {
        let mut log = MessageLog::new();
        let index = log.render_suggestions(["Blog", "Webstore"]);

        assert_eq!(log.toggle_suggestion(index, 0), Some("Blog".into()));
        let group = log.suggestion_group(index).unwrap();
        assert!(group.suggestions[0].selected);
        assert!(!group.suggestions[1].selected);

        // Toggling again clears the mark; the control stays usable.
        assert_eq!(log.toggle_suggestion(index, 0), Some("Blog".into()));
        assert!(!log.suggestion_group(index).unwrap().suggestions[0].selected);
    }

    #[test]
    fn test_toggle_on_message_entry_is_none() {
        let mut log = MessageLog::new();
        log.append_message("hello", Sender::Bot);
        assert_eq!(log.toggle_suggestion(0, 0), None);
    }
}
