use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::{ChatClient, ChatRequest, ChatResponse, ContentPart, Role, Usage};
use crate::config::DEFAULT_MAX_TOKENS_FALLBACK;
use crate::errors::ClientError;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.into(),
        }
    }

    fn build_body(&self, request: &ChatRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|message| {
                let role = match message.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                };
                json!({"role": role, "content": content_to_blocks(&message.content)})
            })
            .collect();

        // Anthropic requires a numeric cap; a config that asked for
        // unbounded output (`max_tokens: None`) falls back to a fixed
        // default rather than omitting the field.
        let max_tokens = request.max_tokens.unwrap_or_else(|| {
            tracing::warn!(
                fallback = DEFAULT_MAX_TOKENS_FALLBACK,
                "anthropic requires max_tokens; endpoint asked for unbounded output"
            );
            DEFAULT_MAX_TOKENS_FALLBACK
        });

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": max_tokens,
            "temperature": request.temperature,
        });
        if let Some(system) = &request.system {
            body["system"] = json!(system);
        }
        if let Some(schema) = &request.response_schema {
            body["tools"] = json!([{
                "name": "emit_decision",
                "input_schema": schema,
            }]);
            body["tool_choice"] = json!({"type": "tool", "name": "emit_decision"});
        }
        body
    }
}

fn content_to_blocks(parts: &[ContentPart]) -> Value {
    let rendered: Vec<Value> = parts
        .iter()
        .map(|part| match part {
            ContentPart::Text { text } => json!({"type": "text", "text": text}),
            ContentPart::Image { base64 } => json!({
                "type": "image",
                "source": {"type": "base64", "media_type": "image/png", "data": base64},
            }),
        })
        .collect();
    json!(rendered)
}

#[async_trait]
impl ChatClient for AnthropicClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let body = self.build_body(request);
        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Provider(format!("{status}: {text}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| ClientError::InvalidResponse(err.to_string()))?;

        let blocks = payload
            .get("content")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ClientError::InvalidResponse("missing content[]".to_string()))?;

        let content = blocks
            .iter()
            .find_map(|block| block.get("input").map(|input| input.to_string()))
            .or_else(|| {
                blocks
                    .iter()
                    .find_map(|block| block.get("text").and_then(|v| v.as_str()).map(String::from))
            })
            .ok_or_else(|| ClientError::InvalidResponse("no text or tool_use block in content[]".to_string()))?;

        let usage = payload.get("usage").map(|usage| {
            let prompt = usage.get("input_tokens").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
            let completion = usage.get("output_tokens").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
            Usage {
                prompt,
                completion,
                total: prompt + completion,
            }
        });

        Ok(ChatResponse { content, usage })
    }
}
