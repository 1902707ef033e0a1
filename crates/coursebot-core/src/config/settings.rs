//! Assistant settings and their defaults

use serde::{Deserialize, Serialize};

use crate::providers::ProviderModelConfig;

use super::error::{ConfigError, ConfigResult};

/// Overrides `model.provider`
pub const ENV_PROVIDER: &str = "COURSEBOT_PROVIDER";
/// Overrides `model.model`
pub const ENV_MODEL: &str = "COURSEBOT_MODEL";

const MAX_HISTORY_LIMIT: usize = 10;

/// Top-level configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AssistantConfig {
    pub model: ModelSettings,
    pub search: SearchSettings,
    pub session: SessionSettings,
    /// Replaces the built-in system prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// Language model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub provider: String,
    pub model: String,
    /// Falls back to the provider's environment variable when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key: None,
            api_base: None,
            temperature: 0.0,
            max_tokens: 800,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Passages returned per search
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { max_results: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Exchanges remembered per session
    pub max_history: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { max_history: 2 }
    }
}

impl AssistantConfig {
    /// Check values that would make the assistant misbehave
    pub fn validate(&self) -> ConfigResult<()> {
        if self.model.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model.model must not be empty".into()));
        }
        if self.model.max_tokens == 0 {
            return Err(ConfigError::Invalid("model.max_tokens must be positive".into()));
        }
        if self.search.max_results == 0 {
            return Err(ConfigError::Invalid(
                "search.max_results must be positive for search to return anything".into(),
            ));
        }
        if self.session.max_history > MAX_HISTORY_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "session.max_history must be at most {}",
                MAX_HISTORY_LIMIT
            )));
        }
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = lookup(ENV_PROVIDER).filter(|v| !v.is_empty()) {
            self.model.provider = provider;
        }
        if let Some(model) = lookup(ENV_MODEL).filter(|v| !v.is_empty()) {
            self.model.model = model;
        }
    }

    /// Connection settings for the model client
    pub fn provider_config(&self) -> ProviderModelConfig {
        let mut config = ProviderModelConfig::new(&self.model.provider, &self.model.model);
        if let Some(key) = &self.model.api_key {
            config = config.with_api_key(key);
        }
        if let Some(base) = &self.model.api_base {
            config = config.with_api_base(base);
        }
        config
    }
}
