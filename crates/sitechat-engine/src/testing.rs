//! Test double for the Dialogue Service.
//!
//! Compiled for this crate's tests and, with the `test-utils` feature, for
//! downstream crates' tests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::client::{DialogueError, DialogueService};
use crate::protocol::{ChatReply, ChatRequest, UpdateReply, UpdateRequest};

/// Replays queued results and records every request it receives.
///
/// A call with nothing queued fails with HTTP 503 and no message.
#[derive(Debug, Default)]
pub struct ScriptedService {
    chat_replies: Mutex<VecDeque<Result<ChatReply, DialogueError>>>,
    update_replies: Mutex<VecDeque<Result<UpdateReply, DialogueError>>>,
    chats: Mutex<Vec<ChatRequest>>,
    updates: Mutex<Vec<UpdateRequest>>,
}

impl ScriptedService {
    /// Queue a chat reply.
    #[must_use]
    pub fn with_chat_reply(self, reply: ChatReply) -> Self {
        push(&self.chat_replies, Ok(reply));
        self
    }

    /// Queue a chat failure.
    #[must_use]
    pub fn with_chat_error(self, err: DialogueError) -> Self {
        push(&self.chat_replies, Err(err));
        self
    }

    /// Queue a website update reply.
    #[must_use]
    pub fn with_update_reply(self, message: &str) -> Self {
        push(
            &self.update_replies,
            Ok(UpdateReply {
                message: message.into(),
            }),
        );
        self
    }

    /// Queue a website update failure.
    #[must_use]
    pub fn with_update_error(self, err: DialogueError) -> Self {
        push(&self.update_replies, Err(err));
        self
    }

    /// Chat requests received, in order.
    pub fn chats(&self) -> Vec<ChatRequest> {
        self.chats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Update requests received, in order.
    pub fn updates(&self) -> Vec<UpdateRequest> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn push<T>(queue: &Mutex<VecDeque<T>>, item: T) {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push_back(item);
}

fn next_or_unavailable<T>(
    queue: &Mutex<VecDeque<Result<T, DialogueError>>>,
) -> Result<T, DialogueError> {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front()
        .unwrap_or(Err(DialogueError::Status {
            code: 503,
            message: None,
        }))
}

#[async_trait]
impl DialogueService for ScriptedService {
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, DialogueError> {
        self.chats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        next_or_unavailable(&self.chat_replies)
    }

    async fn update_website(&self, request: UpdateRequest) -> Result<UpdateReply, DialogueError> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        next_or_unavailable(&self.update_replies)
    }
}
