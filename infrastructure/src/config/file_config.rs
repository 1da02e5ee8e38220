//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the config file and are
//! deserialized directly.

use roundtable_application::{DiscussionTiming, GenerationSettings};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Generation provider settings
    pub provider: FileProviderConfig,
    /// Discussion pacing and sampling settings
    pub discussion: FileDiscussionConfig,
}

/// `[provider]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// OpenAI-compatible API base URL
    pub base_url: String,
    /// API key; also taken from `ROUNDTABLE_API_KEY`
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Overall request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.moonshot.cn/v1".to_string(),
            api_key: None,
            model: "moonshot-v1-128k".to_string(),
            timeout_secs: 60,
        }
    }
}

/// `[discussion]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    /// Pacing delay between persona turns, milliseconds
    pub turn_delay_ms: u64,
    /// Window between stages, milliseconds
    pub stage_delay_ms: u64,
    /// Floor hold-off after a user intervention, milliseconds
    pub interrupt_holdoff_ms: u64,
    /// Sampling temperature
    pub temperature: f32,
    /// Output token budget per turn
    pub max_tokens: u32,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        Self {
            turn_delay_ms: 500,
            stage_delay_ms: 1000,
            interrupt_holdoff_ms: 2000,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

impl FileDiscussionConfig {
    pub fn timing(&self) -> DiscussionTiming {
        DiscussionTiming {
            turn_delay: Duration::from_millis(self.turn_delay_ms),
            stage_delay: Duration::from_millis(self.stage_delay_ms),
            interrupt_holdoff: Duration::from_millis(self.interrupt_holdoff_ms),
        }
    }

    pub fn settings(&self) -> GenerationSettings {
        GenerationSettings {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_discussion_pacing() {
        let config = FileConfig::default();
        assert_eq!(config.discussion.turn_delay_ms, 500);
        assert_eq!(config.discussion.stage_delay_ms, 1000);
        assert_eq!(config.provider.model, "moonshot-v1-128k");
        assert!(config.provider.api_key.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [provider]
            model = "moonshot-v1-32k"
            "#,
        )
        .unwrap();
        assert_eq!(config.provider.model, "moonshot-v1-32k");
        assert_eq!(config.provider.base_url, "https://api.moonshot.cn/v1");
        assert_eq!(config.discussion.max_tokens, 2000);
    }

    #[test]
    fn test_timing_conversion() {
        let config = FileDiscussionConfig::default();
        assert_eq!(config.timing().turn_delay, Duration::from_millis(500));
        assert_eq!(config.settings().max_tokens, 2000);
    }
}
