//! Model client trait definition

use async_trait::async_trait;

use crate::types::{ChatMessage, ModelResponse, ToolChoice, ToolDefinition};
use super::error::ProviderResult;

/// Model configuration for provider requests
#[derive(Debug, Clone)]
pub struct ProviderModelConfig {
    /// Provider identifier (e.g., "anthropic", "openai")
    pub provider: String,
    /// Model identifier as used by the provider's API
    pub model: String,
    /// API key for authentication
    pub api_key: Option<String>,
    /// Custom API base URL
    pub api_base: Option<String>,
}

impl ProviderModelConfig {
    /// Create a new model config
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            api_key: None,
            api_base: None,
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the API base URL
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }
}

/// One request to the model
///
/// `tools` and `tool_choice` are either both set or both absent.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// Conversation so far, oldest first
    pub messages: Vec<ChatMessage>,
    /// System instruction content
    pub system: String,
    /// Tools offered on this call
    pub tools: Option<Vec<ToolDefinition>>,
    /// Tool choice behavior
    pub tool_choice: Option<ToolChoice>,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a request without tools
    pub fn new(system: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            system: system.into(),
            ..Default::default()
        }
    }

    /// Offer tools with automatic choice
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self.tool_choice = Some(ToolChoice::Auto);
        self
    }

    /// Set sampling parameters
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Whether any tool is offered
    pub fn offers_tools(&self) -> bool {
        self.tools.as_ref().is_some_and(|t| !t.is_empty())
    }
}

/// Language model client
///
/// Implementations perform exactly one model call per `complete`.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Get the client name (e.g., "anthropic", "mock")
    fn name(&self) -> &str;

    /// Run a single completion
    async fn complete(&self, request: CompletionRequest) -> ProviderResult<ModelResponse>;
}
