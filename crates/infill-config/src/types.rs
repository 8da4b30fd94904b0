//! Core configuration types

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Immutable settings snapshot for one completion engine instance
///
/// The host replaces the whole snapshot on a settings change; the engine
/// clones an `Arc` of it per request, so an in-flight request always sees a
/// consistent view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompletionConfig {
    /// Master switch; when off the engine produces no completions
    pub enabled: bool,
    /// Milliseconds a trigger burst must stay quiet before a request fires
    pub debounce_wait_ms: u64,
    /// Lines of document text taken above and below the cursor
    pub context_length: usize,
    /// Model name sent to the inference server
    pub model: String,
    /// Inference server hostname
    pub api_hostname: String,
    /// Port override; `None` uses the provider's default port
    pub api_port: Option<u16>,
    /// Completion path override; `None` uses the provider's default path
    pub api_path: Option<String>,
    /// Bearer token attached as an `Authorization` header when set
    pub api_bearer_token: Option<String>,
    /// Provider identifier (`ollama`, `llamacpp`, `lmstudio`)
    pub provider: String,
    /// Sampling temperature for generation
    pub temperature: f32,
    /// Maximum number of new tokens the server may generate
    pub max_new_tokens: u32,
    /// Include related open documents in the prompt
    pub use_file_context: bool,
    /// FIM template format tag (`codellama`, `deepseek`, `stable-code`)
    pub template_format: String,
    /// Allow completions spanning multiple lines
    pub multiline: bool,
    /// Line budget for multi-line completions
    pub max_lines: usize,
    /// Allow requests triggered by auto-suggest characters
    pub auto_suggest: bool,
    /// Reuse finished completions for identical cursor contexts
    pub cache_enabled: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_wait_ms: 300,
            context_length: 100,
            model: "codellama:7b-code".to_string(),
            api_hostname: "localhost".to_string(),
            api_port: None,
            api_path: None,
            api_bearer_token: None,
            provider: "ollama".to_string(),
            temperature: 0.2,
            max_new_tokens: 512,
            use_file_context: true,
            template_format: "codellama".to_string(),
            multiline: false,
            max_lines: 30,
            auto_suggest: true,
            cache_enabled: true,
        }
    }
}

impl CompletionConfig {
    /// Validate the snapshot before handing it to the engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_hostname.trim().is_empty() {
            return Err(ConfigError::MissingSetting("api_hostname"));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::MissingSetting("model"));
        }
        if self.provider.trim().is_empty() {
            return Err(ConfigError::MissingSetting("provider"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                setting: "temperature",
                reason: format!("{} is outside 0.0..=2.0", self.temperature),
            });
        }
        if self.max_new_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                setting: "max_new_tokens",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
