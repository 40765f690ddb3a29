//! HTTP client for the Dialogue Service.
//!
//! The [`DialogueService`] trait is the seam the conversation widget talks
//! through; [`HttpDialogueClient`] is the real implementation over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::protocol::{
    ChatReply, ChatRequest, UpdateReply, UpdateRequest, CHAT_PATH, UPDATE_WEBSITE_PATH,
};

/// Something that can answer chat and website-update requests.
#[async_trait]
pub trait DialogueService: Send + Sync {
    /// Advance the guided conversation.
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, DialogueError>;

    /// Apply a free-form instruction to the generated website.
    async fn update_website(&self, request: UpdateRequest) -> Result<UpdateReply, DialogueError>;
}

/// Dialogue Service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDialogueClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpDialogueClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DialogueError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(DialogueError::InvalidUrl(base_url));
        }
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DialogueError::Transport)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Create a client from configuration.
    pub fn from_config(config: &Config) -> Result<Self, DialogueError> {
        Self::new(
            config.server_url.clone(),
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a path (or absolute URL) against the base URL.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, DialogueError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.resolve(path);
        debug!(%url, "posting to dialogue service");

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(DialogueError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            // The service explains failures as `{"message": ...}`; anything else is dropped.
            let message = response
                .bytes()
                .await
                .ok()
                .and_then(|body| serde_json::from_slice::<ErrorBody>(&body).ok())
                .map(|body| body.message);
            return Err(DialogueError::Status {
                code: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await.map_err(DialogueError::Transport)?;
        serde_json::from_slice(&bytes).map_err(DialogueError::Protocol)
    }
}

#[async_trait]
impl DialogueService for HttpDialogueClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, DialogueError> {
        self.post_json(CHAT_PATH, &request).await
    }

    async fn update_website(&self, request: UpdateRequest) -> Result<UpdateReply, DialogueError> {
        self.post_json(UPDATE_WEBSITE_PATH, &request).await
    }
}

/// Body sent with error statuses.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Errors that can occur talking to the Dialogue Service.
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    /// Network, DNS, timeout or other HTTP-layer failure.
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Service answered with a non-success status, with its explanation if it sent one.
    #[error("Service returned HTTP {code}")]
    Status { code: u16, message: Option<String> },

    /// Response body was not the expected JSON shape.
    #[error("Protocol error: {0}")]
    Protocol(#[source] serde_json::Error),

    /// Configured server URL is not an http(s) URL.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

impl DialogueError {
    /// Explanation supplied by the service, if any.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}
