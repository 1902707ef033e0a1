//! GenaiModelClient - model client backed by the genai crate
//!
//! Handles every genai-supported provider (Anthropic, OpenAI, Gemini, ...) as
//! well as OpenAI-compatible endpoints via the ServiceTargetResolver.

use async_trait::async_trait;
use std::sync::Arc;

use genai::Client;

use crate::logging::Logger;
use crate::types::ModelResponse;

use super::error::{ProviderError, ProviderResult};
use super::genai_adapter::{
    api_key_from_env, create_client, from_genai_error, from_genai_response, to_genai_options,
    to_genai_request,
};
use super::traits::{CompletionRequest, ModelClient, ProviderModelConfig};

/// Model client using genai for all supported LLM APIs
pub struct GenaiModelClient {
    config: ProviderModelConfig,
    client: Client,
    logger: Arc<dyn Logger>,
}

impl GenaiModelClient {
    /// Create a new client for the given model config
    pub fn new(config: ProviderModelConfig, logger: Arc<dyn Logger>) -> Self {
        let client = create_client(&config);
        Self {
            config,
            client,
            logger,
        }
    }

    /// Create a client, failing early when no API key can be found
    pub fn try_new(config: ProviderModelConfig, logger: Arc<dyn Logger>) -> ProviderResult<Self> {
        let needs_key = config.provider != "ollama" && config.api_base.is_none();
        if needs_key && config.api_key.is_none() && api_key_from_env(&config.provider).is_none() {
            return Err(ProviderError::missing_api_key(&config.provider));
        }
        Ok(Self::new(config, logger))
    }

    /// Extract model name from a model string (e.g., "openai/gpt-4" -> "gpt-4")
    pub fn extract_model_name(model: &str) -> &str {
        model.split_once('/').map(|(_, name)| name).unwrap_or(model)
    }

    /// Model identifier in use
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl ModelClient for GenaiModelClient {
    fn name(&self) -> &str {
        &self.config.provider
    }

    async fn complete(&self, request: CompletionRequest) -> ProviderResult<ModelResponse> {
        let model_name = Self::extract_model_name(&self.config.model);
        self.logger.info(&format!(
            "[GenaiModelClient] complete called: provider={}, model={}, messages={}, tools={}",
            self.config.provider,
            model_name,
            request.messages.len(),
            request.tools.as_ref().map_or(0, Vec::len)
        ));

        let options = to_genai_options(&request);
        let chat_req = to_genai_request(request)?;

        let response = self
            .client
            .exec_chat(model_name, chat_req, Some(&options))
            .await
            .map_err(|e| {
                self.logger.error(&format!("[GenaiModelClient] Request failed: {}", e));
                from_genai_error(&self.config.provider, e)
            })?;

        let response = from_genai_response(response);
        self.logger.debug(&format!(
            "[GenaiModelClient] Response: {} tool calls, {} chars of text",
            response.tool_calls().len(),
            response.text_content().len()
        ));
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;

    #[test]
    fn test_extract_model_name() {
        assert_eq!(GenaiModelClient::extract_model_name("openai/gpt-4"), "gpt-4");
        assert_eq!(
            GenaiModelClient::extract_model_name("claude-sonnet-4-20250514"),
            "claude-sonnet-4-20250514"
        );
    }

    #[test]
    fn test_explicit_key_is_accepted() {
        let config = ProviderModelConfig::new("anthropic", "claude-sonnet-4-20250514")
            .with_api_key("sk-test");
        let client = GenaiModelClient::try_new(config, Arc::new(NoOpLogger)).unwrap();
        assert_eq!(client.name(), "anthropic");
        assert_eq!(client.model(), "claude-sonnet-4-20250514");
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let config = ProviderModelConfig::new("coursebot_unset_provider", "m");
        assert!(matches!(
            GenaiModelClient::try_new(config, Arc::new(NoOpLogger)),
            Err(ProviderError::MissingApiKey { .. })
        ));
    }
}
