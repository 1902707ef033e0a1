//! Mock model client for testing
//!
//! Provides deterministic, scripted responses without network dependencies.
//! Every request is recorded so tests can assert on what the model was sent.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use super::error::{ProviderError, ProviderResult};
use super::traits::{CompletionRequest, ModelClient};
use crate::logging::{Logger, NoOpLogger};
use crate::types::{ChatMessage, ContentPart, MessageContent, MessageRole, ModelResponse};

/// A single scripted reply
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this response
    Response(ModelResponse),
    /// Fail the call with this message
    Error(String),
}

/// Behavior once the script is exhausted
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    /// Echo back the last user text
    #[default]
    Echo,
    /// Return a fixed text response
    Fixed(String),
    /// Fail every call
    Error(String),
}

/// Mock model client
pub struct MockModelClient {
    script: Mutex<VecDeque<MockReply>>,
    mode: MockMode,
    requests: Mutex<Vec<CompletionRequest>>,
    logger: Arc<dyn Logger>,
}

impl Default for MockModelClient {
    fn default() -> Self {
        Self::echo()
    }
}

impl MockModelClient {
    fn with_mode(mode: MockMode) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            mode,
            requests: Mutex::new(Vec::new()),
            logger: Arc::new(NoOpLogger),
        }
    }

    /// Create an echo client (echoes back the last user text)
    pub fn echo() -> Self {
        Self::with_mode(MockMode::Echo)
    }

    /// Create a fixed response client
    pub fn fixed(response: impl Into<String>) -> Self {
        Self::with_mode(MockMode::Fixed(response.into()))
    }

    /// Create a client that fails every call
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_mode(MockMode::Error(message.into()))
    }

    /// Create a client that plays `replies` in order, then echoes
    pub fn scripted(replies: impl IntoIterator<Item = MockReply>) -> Self {
        let client = Self::echo();
        client.script.lock().extend(replies);
        client
    }

    /// Attach a logger
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Queue a response
    pub fn push_response(&self, response: ModelResponse) {
        self.script.lock().push_back(MockReply::Response(response));
    }

    /// Queue a failure
    pub fn push_error(&self, message: impl Into<String>) {
        self.script.lock().push_back(MockReply::Error(message.into()));
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    /// Number of calls made
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn last_user_text(messages: &[ChatMessage]) -> String {
        for msg in messages.iter().rev() {
            if msg.role != MessageRole::User {
                continue;
            }
            let text = match &msg.content {
                MessageContent::Text(text) => text.clone(),
                MessageContent::Parts(parts) => parts
                    .iter()
                    .filter_map(|p| match p {
                        ContentPart::Text { text } => Some(text.as_str()),
                        _ => None,
                    })
                    .collect(),
            };
            if !text.is_empty() {
                return text;
            }
        }
        "Hello from MockModelClient!".to_string()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> ProviderResult<ModelResponse> {
        self.logger.debug(&format!(
            "[MockModelClient] complete called: {} messages, tools={}",
            request.messages.len(),
            request.offers_tools()
        ));

        let reply = self.script.lock().pop_front();
        let messages = request.messages.clone();
        self.requests.lock().push(request);

        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Error(message)) => Err(ProviderError::Other(message)),
            None => match &self.mode {
                MockMode::Echo => Ok(ModelResponse::text(Self::last_user_text(&messages))),
                MockMode::Fixed(text) => Ok(ModelResponse::text(text.clone())),
                MockMode::Error(message) => Err(ProviderError::Other(message.clone())),
            },
        }
    }
}
