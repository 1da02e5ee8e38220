//! LLM Gateway port
//!
//! Defines the interface for communicating with the text-generation
//! backend. Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// A single generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Fixed behavior instruction (the persona's system prompt)
    pub system_instruction: String,
    /// Composite user prompt for this turn
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Output token budget
    pub max_tokens: u32,
}

impl GenerationRequest {
    pub fn new(system_instruction: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            prompt: prompt.into(),
            temperature: 0.7,
            max_tokens: 2000,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Gateway to the text-generation backend
///
/// Adapters must fail closed: every failure mode becomes a
/// [`GatewayError`], never a panic. Callers absorb errors via the canned
/// fallback path.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Generate a completion for the given request
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = GenerationRequest::new("system", "prompt");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 2000);
    }

    #[test]
    fn test_request_builders() {
        let request = GenerationRequest::new("s", "p")
            .with_temperature(0.2)
            .with_max_tokens(64);
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.max_tokens, 64);
    }
}
