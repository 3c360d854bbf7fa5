//! The in-process seam every provider submodule implements. Not a wire
//! contract — each provider maps this shape onto its own request/response
//! JSON.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ClientError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    Image { base64: String },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl ChatMessage {
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentPart::Text { text: text.into() }],
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChatRequest {
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    /// `None` omits the cap entirely (the config surface's `maxTokens: -1`).
    pub max_tokens: Option<u32>,
    /// When set, the provider is asked to return the arguments of a single
    /// tool call matching this JSON schema instead of free text.
    pub response_schema: Option<Value>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt: u32,
    pub completion: u32,
    pub total: u32,
}

#[derive(Clone, Debug)]
pub struct ChatResponse {
    /// Raw text, or the JSON arguments of the tool call when a
    /// `response_schema` was requested.
    pub content: String,
    pub usage: Option<Usage>,
}

/// One provider's wire client. Implementors must not retry internally — the
/// manager owns all retry/backoff decisions so health accounting stays
/// accurate per attempt.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError>;
}
