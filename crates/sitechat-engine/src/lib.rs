//! sitechat-engine: Headless engine for the sitechat website-builder assistant
//!
//! This crate provides the core conversation logic, including:
//! - Message log and suggestion groups
//! - The linear step indicator
//! - The conversation widget and its relay to the Dialogue Service
//! - HTTP client and wire types for the Dialogue Service
//! - Configuration

pub mod client;
pub mod config;
pub mod conversation;
pub mod linkify;
pub mod protocol;
pub mod stepper;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod widget;

// Re-export commonly used types
pub use client::{DialogueError, DialogueService, HttpDialogueClient};
pub use config::{Config, ConfigError};
pub use conversation::{LogEntry, Message, MessageLog, Sender, Suggestion, SuggestionGroup};
pub use linkify::{linkify, Segment};
pub use protocol::{ChatReply, ChatRequest, UpdateReply, UpdateRequest};
pub use stepper::{StepStatus, Stepper};
pub use widget::{
    ApplyOutcome, Completed, ConversationWidget, Incoming, InputMode, Outgoing, PendingRequest,
    PreviewFrame, SubmitTarget,
};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
