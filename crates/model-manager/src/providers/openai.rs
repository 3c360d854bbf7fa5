use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::{ChatClient, ChatRequest, ChatResponse, ContentPart, Role, Usage};
use crate::errors::ClientError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Works against OpenAI itself and any OpenAI-compatible endpoint (the
/// config surface's `openai_compatible` provider, which also covers
/// Gemini's OpenAI-compatible flavor).
pub struct OpenAiCompatibleClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCompatibleClient {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.into(),
        }
    }

    fn build_body(&self, request: &ChatRequest) -> Value {
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(json!({"role": "system", "content": system}));
        }
        for message in &request.messages {
            let role = match message.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            messages.push(json!({"role": role, "content": content_to_parts(&message.content)}));
        }

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
        });
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(schema) = &request.response_schema {
            body["tools"] = json!([{
                "type": "function",
                "function": {
                    "name": "emit_decision",
                    "parameters": schema,
                },
            }]);
            body["tool_choice"] = json!({"type": "function", "function": {"name": "emit_decision"}});
        }
        body
    }
}

fn content_to_parts(parts: &[ContentPart]) -> Value {
    if parts.len() == 1 {
        if let ContentPart::Text { text } = &parts[0] {
            return json!(text);
        }
    }
    let rendered: Vec<Value> = parts
        .iter()
        .map(|part| match part {
            ContentPart::Text { text } => json!({"type": "text", "text": text}),
            ContentPart::Image { base64 } => json!({
                "type": "image_url",
                "image_url": {"url": format!("data:image/png;base64,{base64}")},
            }),
        })
        .collect();
    json!(rendered)
}

#[async_trait]
impl ChatClient for OpenAiCompatibleClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let body = self.build_body(request);
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
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

        let choice = payload
            .get("choices")
            .and_then(|c| c.get(0))
            .ok_or_else(|| ClientError::InvalidResponse("missing choices[0]".to_string()))?;
        let message = choice
            .get("message")
            .ok_or_else(|| ClientError::InvalidResponse("missing choices[0].message".to_string()))?;

        let content = if let Some(tool_calls) = message.get("tool_calls").and_then(|v| v.as_array()) {
            tool_calls
                .first()
                .and_then(|call| call.get("function"))
                .and_then(|function| function.get("arguments"))
                .and_then(|arguments| arguments.as_str())
                .ok_or_else(|| ClientError::InvalidResponse("missing tool_calls[0].function.arguments".to_string()))?
                .to_string()
        } else {
            message
                .get("content")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        let usage = payload.get("usage").map(|usage| Usage {
            prompt: usage.get("prompt_tokens").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
            completion: usage.get("completion_tokens").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
            total: usage.get("total_tokens").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
        });

        Ok(ChatResponse { content, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChatMessage;

    #[test]
    fn plain_text_message_serializes_as_a_bare_string() {
        let client = OpenAiCompatibleClient::new("key", None, "gpt-4o-mini");
        let request = ChatRequest {
            messages: vec![ChatMessage::text(Role::User, "hello")],
            ..Default::default()
        };
        let body = client.build_body(&request);
        assert_eq!(body["messages"][0]["content"], json!("hello"));
    }

    #[test]
    fn response_schema_requests_a_forced_tool_call() {
        let client = OpenAiCompatibleClient::new("key", None, "gpt-4o-mini");
        let request = ChatRequest {
            response_schema: Some(json!({"type": "object"})),
            ..Default::default()
        };
        let body = client.build_body(&request);
        assert_eq!(body["tool_choice"]["function"]["name"], json!("emit_decision"));
    }
}
