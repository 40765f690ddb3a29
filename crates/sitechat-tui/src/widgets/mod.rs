//! UI widgets for the TUI.
//!
//! This module provides:
//! - [`StepperBar`] - Top step indicator
//! - [`MessageLogView`] - Scrollable chat log with suggestion chips
//! - [`InputBar`] - Suggestion hints, free-text input or loading indicator
//! - [`StatusBar`] - Bottom status line
//! - [`TextInputState`] - Editable text behind the input bar

mod input_bar;
mod message_log;
mod status_bar;
mod stepper_bar;
mod text_input;

pub use input_bar::InputBar;
pub use message_log::MessageLogView;
pub use status_bar::{StatusBar, StatusBarContent};
pub use stepper_bar::StepperBar;
pub use text_input::TextInputState;
