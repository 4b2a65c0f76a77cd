//! Model backend seam.
//!
//! The harness only needs one request/response call from a backend. The
//! wire types here follow the Anthropic Messages shape, which is what
//! Bedrock's `InvokeModel` accepts for Claude models.

pub mod bedrock;
pub mod credentials;
pub mod sigv4;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

pub use bedrock::{BedrockBackend, BedrockConfig};
pub use credentials::AwsCredentials;

/// A model backend that serves one message request at a time.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Label recorded on every result (e.g. `anthropic-sdk-bedrock`).
    fn label(&self) -> &str;

    /// Model identifier the backend sends requests to.
    fn model_id(&self) -> &str;

    /// Send one request and wait for the complete response.
    async fn invoke(&self, request: &MessageRequest) -> Result<MessageResponse, BackendError>;
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Extended reasoning ("thinking") request block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ThinkingConfig {
    Enabled { budget_tokens: u32 },
}

/// Body of a single message request.
///
/// `thinking` is omitted from the serialized body when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<ThinkingConfig>,
}

impl MessageRequest {
    pub fn builder(prompt: impl Into<String>) -> MessageRequestBuilder {
        MessageRequestBuilder {
            prompt: prompt.into(),
            system: String::new(),
            max_tokens: 1024,
            thinking_budget: None,
        }
    }

    /// Text of the first user message.
    pub fn prompt(&self) -> &str {
        self.messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Builder for [`MessageRequest`].
#[derive(Debug, Clone)]
pub struct MessageRequestBuilder {
    prompt: String,
    system: String,
    max_tokens: u32,
    thinking_budget: Option<u32>,
}

impl MessageRequestBuilder {
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Enable extended reasoning with the given token budget.
    pub fn thinking(mut self, budget_tokens: u32) -> Self {
        self.thinking_budget = Some(budget_tokens);
        self
    }

    /// Enable extended reasoning only when `budget` is `Some`.
    pub fn thinking_opt(mut self, budget: Option<u32>) -> Self {
        self.thinking_budget = budget;
        self
    }

    pub fn build(self) -> MessageRequest {
        MessageRequest {
            max_tokens: self.max_tokens,
            system: self.system,
            messages: vec![Message::user(self.prompt)],
            thinking: self
                .thinking_budget
                .map(|budget_tokens| ThinkingConfig::Enabled { budget_tokens }),
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// One block of response content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    Thinking {
        thinking: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        signature: Option<String>,
    },
    RedactedThinking {
        data: String,
    },
    /// Block kinds the harness does not record (tool use, etc.).
    #[serde(other)]
    Unsupported,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn thinking(thinking: impl Into<String>) -> Self {
        ContentBlock::Thinking {
            thinking: thinking.into(),
            signature: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

/// A complete model response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Usage,
}

impl MessageResponse {
    pub fn new(content: Vec<ContentBlock>, input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            content,
            usage: Usage {
                input_tokens,
                output_tokens,
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_without_thinking_omits_field() {
        let req = MessageRequest::builder("hello")
            .system("be brief")
            .max_tokens(8192)
            .build();
        let v = serde_json::to_value(&req).expect("serialize");
        assert_eq!(
            v,
            json!({
                "max_tokens": 8192,
                "system": "be brief",
                "messages": [{"role": "user", "content": "hello"}],
            })
        );
    }

    #[test]
    fn request_with_thinking_includes_budget() {
        let req = MessageRequest::builder("puzzle").thinking(4096).build();
        let v = serde_json::to_value(&req).expect("serialize");
        assert_eq!(v["thinking"], json!({"type": "enabled", "budget_tokens": 4096}));
    }

    #[test]
    fn thinking_opt_none_leaves_field_unset() {
        let req = MessageRequest::builder("x").thinking_opt(None).build();
        assert!(req.thinking.is_none());
        assert_eq!(req.prompt(), "x");
    }

    #[test]
    fn response_decodes_mixed_blocks() {
        let body = json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-opus-4-5",
            "content": [
                {"type": "thinking", "thinking": "because X", "signature": "sig"},
                {"type": "text", "text": "final answer: 42"},
                {"type": "tool_use", "id": "t1", "name": "calc", "input": {}}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 12, "output_tokens": 34, "cache_read_input_tokens": 0}
        });
        let resp: MessageResponse = serde_json::from_value(body).expect("decode");
        assert_eq!(resp.content.len(), 3);
        assert_eq!(
            resp.content[0],
            ContentBlock::Thinking {
                thinking: "because X".to_string(),
                signature: Some("sig".to_string()),
            }
        );
        assert_eq!(resp.content[1], ContentBlock::text("final answer: 42"));
        assert_eq!(resp.content[2], ContentBlock::Unsupported);
        assert_eq!(resp.usage.input_tokens, 12);
        assert_eq!(resp.usage.output_tokens, 34);
    }

    #[test]
    fn response_without_content_decodes_empty() {
        let resp: MessageResponse =
            serde_json::from_value(json!({"usage": {"input_tokens": 5, "output_tokens": 0}}))
                .expect("decode");
        assert!(resp.content.is_empty());
        assert_eq!(resp.usage.input_tokens, 5);
    }
}
