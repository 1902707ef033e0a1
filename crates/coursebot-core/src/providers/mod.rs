//! Model client implementations
//!
//! The orchestrator talks to a language model only through `ModelClient`,
//! one call per `complete`. `GenaiModelClient` is the production client; the
//! `MockModelClient` plays scripted responses for tests.

mod traits;
mod error;
mod genai_adapter;
mod genai_client;
mod mock;

pub use traits::{CompletionRequest, ModelClient, ProviderModelConfig};
pub use error::{ProviderError, ProviderResult};
pub use genai_adapter::api_key_from_env;
pub use genai_client::GenaiModelClient;
pub use mock::{MockModelClient, MockMode, MockReply};

use crate::logging::Logger;
use std::sync::Arc;

/// Create a model client for the given config
///
/// The `mock` provider yields an echoing `MockModelClient`.
pub fn create_model_client(
    config: ProviderModelConfig,
    logger: Arc<dyn Logger>,
) -> ProviderResult<Arc<dyn ModelClient>> {
    match config.provider.to_lowercase().as_str() {
        "mock" => Ok(Arc::new(MockModelClient::echo().with_logger(logger))),
        _ => Ok(Arc::new(GenaiModelClient::try_new(config, logger)?)),
    }
}

/// List the provider IDs known to work
pub fn supported_providers() -> Vec<&'static str> {
    vec![
        "anthropic",
        "openai",
        "gemini",
        "ollama",
        "groq",
        "xai",
        "deepseek",
        "openrouter",
        "mistral",
        "mock",
    ]
}
