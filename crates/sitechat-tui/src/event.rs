//! Event handling for the sitechat TUI.

use crate::app::Focus;
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// A tick event for UI updates.
    Tick,
    /// Terminal was resized.
    Resize(u16, u16),
}

/// Event handler that runs in a background thread.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        // Crossterm polling is blocking, so it gets its own thread.
        std::thread::spawn(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let event = match evt {
                            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                                Some(Event::Key(key))
                            }
                            CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
                            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
                            _ => None,
                        };
                        if let Some(e) = event {
                            if tx_clone.send(e).is_err() {
                                break;
                            }
                        }
                    }
                } else if tx_clone.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Get the next event, waiting until one is available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    /// Move the suggestion cursor left, or the text cursor.
    Left,
    /// Move the suggestion cursor right, or the text cursor.
    Right,
    /// Pick the suggestion at this 0-based position in the latest group.
    Choose(usize),
    /// Pick the highlighted suggestion, or submit the typed text.
    Select,
    /// Move the suggestion cursor to the previous suggestion group.
    PrevGroup,
    /// Move the suggestion cursor to the next suggestion group.
    NextGroup,
    /// Move keyboard focus between the chat log and the input bar.
    ToggleFocus,
    ScrollUp,
    ScrollDown,
    Char(char),
    Backspace,
    Delete,
    Home,
    End,
    HistoryPrev,
    HistoryNext,
    None,
}

/// Convert a key event to an action for whatever has focus.
pub fn key_to_action(key: KeyEvent, focus: Focus) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Esc => return Action::Quit,
        KeyCode::F(1) => return Action::Help,
        KeyCode::PageUp => return Action::ScrollUp,
        KeyCode::PageDown => return Action::ScrollDown,
        KeyCode::Enter => return Action::Select,
        KeyCode::Tab | KeyCode::BackTab => return Action::ToggleFocus,
        _ => {}
    }

    match focus {
        Focus::Log => match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('?') => Action::Help,
            KeyCode::Left | KeyCode::Char('h') => Action::Left,
            KeyCode::Right | KeyCode::Char('l') => Action::Right,
            KeyCode::Up | KeyCode::Char('k') => Action::PrevGroup,
            KeyCode::Down | KeyCode::Char('j') => Action::NextGroup,
            KeyCode::Char(c @ '1'..='9') => Action::Choose(c as usize - '1' as usize),
            _ => Action::None,
        },
        Focus::Input => match key.code {
            KeyCode::Char(c) => Action::Char(c),
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Delete => Action::Delete,
            KeyCode::Left => Action::Left,
            KeyCode::Right => Action::Right,
            KeyCode::Home => Action::Home,
            KeyCode::End => Action::End,
            KeyCode::Up => Action::HistoryPrev,
            KeyCode::Down => Action::HistoryNext,
            _ => Action::None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_c, Focus::Log), Action::Quit);
        assert_eq!(key_to_action(ctrl_c, Focus::Input), Action::Quit);
    }

    #[test]
    fn test_digits_choose_in_log() {
        assert_eq!(
            key_to_action(key(KeyCode::Char('1')), Focus::Log),
            Action::Choose(0)
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('9')), Focus::Log),
            Action::Choose(8)
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('0')), Focus::Log),
            Action::None
        );
    }

    #[test]
    fn test_letters_are_text_in_input() {
        assert_eq!(
            key_to_action(key(KeyCode::Char('q')), Focus::Input),
            Action::Char('q')
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('1')), Focus::Input),
            Action::Char('1')
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('q')), Focus::Log),
            Action::Quit
        );
    }

    #[test]
    fn test_enter_selects_everywhere() {
        assert_eq!(
            key_to_action(key(KeyCode::Enter), Focus::Log),
            Action::Select
        );
        assert_eq!(
            key_to_action(key(KeyCode::Enter), Focus::Input),
            Action::Select
        );
    }

    #[test]
    fn test_tab_toggles_focus_everywhere() {
        assert_eq!(key_to_action(key(KeyCode::Tab), Focus::Log), Action::ToggleFocus);
        assert_eq!(key_to_action(key(KeyCode::Tab), Focus::Input), Action::ToggleFocus);
    }

    #[test]
    fn test_up_down_move_between_groups_in_log() {
        assert_eq!(key_to_action(key(KeyCode::Up), Focus::Log), Action::PrevGroup);
        assert_eq!(key_to_action(key(KeyCode::Down), Focus::Log), Action::NextGroup);
        assert_eq!(key_to_action(key(KeyCode::Up), Focus::Input), Action::HistoryPrev);
    }
}
