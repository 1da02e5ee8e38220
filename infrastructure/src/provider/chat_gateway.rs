//! OpenAI-compatible chat-completions gateway
//!
//! Talks to a Moonshot-style `chat/completions` endpoint. Fails closed:
//! every failure mode (missing key, transport error, bad status, malformed
//! body) becomes a [`GatewayError`] for the responder's fallback path.

use crate::config::FileProviderConfig;
use async_trait::async_trait;
use roundtable_application::{GatewayError, GenerationRequest, LlmGateway};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Gateway to an OpenAI-compatible chat-completions API
pub struct ChatCompletionsGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl ChatCompletionsGateway {
    /// Build a gateway from provider configuration
    pub fn new(config: &FileProviderConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// Whether an API key is configured
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl LlmGateway for ChatCompletionsGateway {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        let Some(api_key) = &self.api_key else {
            return Err(GatewayError::NotConfigured(
                "no API key; set ROUNDTABLE_API_KEY or [provider] api_key".to_string(),
            ));
        };

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(model = %self.model, "sending chat-completions request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GatewayError::MalformedResponse("no completion choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> FileProviderConfig {
        FileProviderConfig {
            base_url: "https://api.moonshot.cn/v1/".to_string(),
            api_key: api_key.map(|k| k.to_string()),
            model: "moonshot-v1-128k".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_endpoint_normalizes_trailing_slash() {
        let gateway = ChatCompletionsGateway::new(&config(Some("k"))).unwrap();
        assert_eq!(
            gateway.endpoint(),
            "https://api.moonshot.cn/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_closed() {
        let gateway = ChatCompletionsGateway::new(&config(None)).unwrap();
        assert!(!gateway.is_configured());

        let request = GenerationRequest::new("system", "prompt");
        let result = gateway.generate(&request).await;
        assert!(matches!(result, Err(GatewayError::NotConfigured(_))));
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"好的"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("好的")
        );
    }
}
