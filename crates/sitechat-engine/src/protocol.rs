//! Wire types for the Dialogue Service.
//!
//! Two endpoints are spoken: `POST /chat` advances the guided conversation,
//! `POST /update_website` applies a free-form instruction to the generated site.

use serde::{Deserialize, Serialize};

/// Path of the conversation endpoint.
pub const CHAT_PATH: &str = "/chat";

/// Path of the website update endpoint.
pub const UPDATE_WEBSITE_PATH: &str = "/update_website";

/// Phase in which the service asks its final, free-text question.
pub const FREE_TEXT_PHASE: i64 = 4;

/// Phase reported once the website has been generated.
pub const SITE_GENERATED_PHASE: i64 = 5;

/// Body of a `POST /chat` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Text the user sent (typed or a suggestion label).
    pub message: String,
    /// Session identifier the service keys its per-user state on.
    pub user_id: String,
    /// Step the client is currently showing.
    pub step: u32,
}

/// Body of a `POST /chat` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Bot message, always rendered.
    pub message: String,
    /// Suggestion labels for the next turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    /// Conversational milestone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<i64>,
    /// Step the indicator should move to.
    #[serde(
        default,
        rename = "nextStep",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_step: Option<u32>,
    /// Relative or absolute URL of the generated site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl ChatReply {
    /// Whether this reply asks for the final free-text answer.
    pub fn is_free_text_phase(&self) -> bool {
        self.phase == Some(FREE_TEXT_PHASE)
    }

    /// Whether this reply announces that the site has been generated.
    pub fn is_site_generated(&self) -> bool {
        self.link.is_some() || self.phase.is_some_and(|p| p >= SITE_GENERATED_PHASE)
    }
}

/// Body of a `POST /update_website` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    /// Free-form change to apply to the generated site.
    pub instruction: String,
}

/// Body of a `POST /update_website` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReply {
    /// Bot message describing the result.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatRequest {
            message: "Blog".into(),
            user_id: "12345".into(),
            step: 1,
        };
        insta::assert_json_snapshot!(request, @r#"
        {
          "message": "Blog",
          "user_id": "12345",
          "step": 1
        }
        "#);
    }

    #[test]
    fn test_chat_reply_parses_camel_case_next_step() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"message":"Pick a colour","suggestions":["Red","Blue"],"nextStep":3}"#,
        )
        .unwrap();
        assert_eq!(reply.next_step, Some(3));
        assert_eq!(
            reply.suggestions,
            Some(vec!["Red".to_string(), "Blue".to_string()])
        );
        assert!(reply.phase.is_none());
        assert!(!reply.is_free_text_phase());
    }

    #[test]
    fn test_chat_reply_message_only() {
        let reply: ChatReply = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(reply.message, "hi");
        assert!(reply.suggestions.is_none());
        assert!(reply.next_step.is_none());
        assert!(!reply.is_site_generated());
    }

    #[test]
    fn test_chat_reply_requires_message() {
        assert!(serde_json::from_str::<ChatReply>(r#"{"phase":4}"#).is_err());
    }

    #[test]
    fn test_site_generated_detection() {
        let by_phase: ChatReply =
            serde_json::from_str(r#"{"message":"done","phase":5}"#).unwrap();
        assert!(by_phase.is_site_generated());

        let by_link: ChatReply =
            serde_json::from_str(r#"{"message":"done","link":"/view_website"}"#).unwrap();
        assert!(by_link.is_site_generated());

        let final_question: ChatReply =
            serde_json::from_str(r#"{"message":"Anything else?","phase":4,"nextStep":4}"#)
                .unwrap();
        assert!(final_question.is_free_text_phase());
        assert!(!final_question.is_site_generated());
    }

    #[test]
    fn test_update_request_wire_shape() {
        let request = UpdateRequest {
            instruction: "Make the header blue".into(),
        };
        insta::assert_json_snapshot!(request, @r#"
        {
          "instruction": "Make the header blue"
        }
        "#);
    }
}
