//! Configuration types for the sitechat client.
//!
//! This module defines the configuration schema: where the Dialogue Service
//! lives, the session identifier, and the widget's opening content.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for sitechat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Dialogue Service.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Session identifier sent with every chat request.
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Whether to show a loading indicator while a request is in flight.
    #[serde(default = "default_show_loading")]
    pub show_loading: bool,

    /// Timeout in seconds for a single request.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,

    /// First bot message shown on startup.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Suggestions offered with the greeting.
    #[serde(default = "default_initial_suggestions")]
    pub initial_suggestions: Vec<String>,

    /// Labels of the step indicators, in order.
    #[serde(default = "default_step_labels")]
    pub step_labels: Vec<String>,
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".into()
}

fn default_user_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_show_loading() -> bool {
    true
}

fn default_timeout() -> u64 {
    120
}

fn default_greeting() -> String {
    "Welcome! What type of website would you like to create?".into()
}

fn default_initial_suggestions() -> Vec<String> {
    vec!["Portfolio/CV".into(), "Blog".into(), "Landing Page".into()]
}

fn default_step_labels() -> Vec<String> {
    vec![
        "Website type".into(),
        "Background".into(),
        "Main colour".into(),
        "Details".into(),
    ]
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration from a file, creating it with defaults if it does not exist.
    ///
    /// The session id is persisted on first use so later runs continue the
    /// same conversation with the Dialogue Service.
    pub fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load(path);
        }
        let config = Self::default();
        config.save(path)?;
        tracing::info!(path = %path.display(), "created default config");
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Return a copy pointing at a different server.
    #[must_use]
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            user_id: default_user_id(),
            show_loading: default_show_loading(),
            request_timeout_seconds: default_timeout(),
            greeting: default_greeting(),
            initial_suggestions: default_initial_suggestions(),
            step_labels: default_step_labels(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
