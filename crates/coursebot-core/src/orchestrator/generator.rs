//! ToolOrchestrator - the round-bounded generation loop

use std::sync::Arc;

use crate::logging::{Logger, NoOpLogger};
use crate::providers::{CompletionRequest, ModelClient};
use crate::tools::ToolRegistry;
use crate::types::{ChatMessage, ModelResponse, Source, ToolDefinition};

use super::error::GenerateError;
use super::prompt::{build_system_content, DEFAULT_SYSTEM_PROMPT};

/// Model calls that may request tools; one forced call may follow
pub const MAX_TOOL_ROUNDS: usize = 2;

const DEFAULT_TEMPERATURE: f32 = 0.0;
const DEFAULT_MAX_TOKENS: u32 = 800;

/// Where the loop is and what the next model call may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundState {
    /// 1-based round index
    pub round: usize,
    /// Whether tool definitions go out with this round's call
    pub tools_offered: bool,
}

impl RoundState {
    fn new(round: usize, tools: Option<&[ToolDefinition]>) -> Self {
        Self {
            round,
            tools_offered: round == 1 && tools.is_some_and(|t| !t.is_empty()),
        }
    }

    fn is_last(&self) -> bool {
        self.round >= MAX_TOOL_ROUNDS
    }
}

/// Answer plus what it took to produce it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOutput {
    pub answer: String,
    /// Sources from every successful dispatch, in dispatch order
    pub sources: Vec<Source>,
    pub model_calls: usize,
    pub tool_dispatches: usize,
}

/// Drives a query through at most two tool rounds and one forced final call
pub struct ToolOrchestrator {
    client: Arc<dyn ModelClient>,
    system_prompt: String,
    temperature: f32,
    max_tokens: u32,
    logger: Arc<dyn Logger>,
}

impl ToolOrchestrator {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            logger: Arc::new(NoOpLogger),
        }
    }

    /// Replace the built-in system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Generate an answer, dispatching tool calls through `registry`.
    ///
    /// Without a registry, a tool-use response is never dispatched and its
    /// text is returned as-is. Only model failures are returned as errors.
    pub async fn generate(
        &self,
        query: &str,
        history: Option<&str>,
        tools: Option<&[ToolDefinition]>,
        registry: Option<&ToolRegistry>,
    ) -> Result<String, GenerateError> {
        self.generate_with_sources(query, history, tools, registry)
            .await
            .map(|output| output.answer)
    }

    /// Like `generate`, also returning the sources that came with each dispatch
    pub async fn generate_with_sources(
        &self,
        query: &str,
        history: Option<&str>,
        tools: Option<&[ToolDefinition]>,
        registry: Option<&ToolRegistry>,
    ) -> Result<GenerationOutput, GenerateError> {
        let system = build_system_content(&self.system_prompt, history);
        let mut messages = vec![ChatMessage::user(query)];
        let mut output = GenerationOutput::default();

        for round in 1..=MAX_TOOL_ROUNDS {
            let state = RoundState::new(round, tools);
            let offered = if state.tools_offered { tools } else { None };

            let response = self.call_model(&system, &messages, offered, &mut output).await?;
            self.logger.debug(&format!(
                "[ToolOrchestrator] Round {} response: tools_offered={}, tool_use={}",
                state.round,
                state.tools_offered,
                response.requests_tool_use()
            ));

            let registry = match registry {
                Some(registry) if response.requests_tool_use() => registry,
                _ => {
                    output.answer = response.text_content();
                    return Ok(output);
                }
            };

            self.execute_tools(&response, registry, &mut messages, &mut output)
                .await;

            if state.is_last() {
                self.logger.info(&format!(
                    "[ToolOrchestrator] Tool rounds exhausted after {} rounds, making final call without tools",
                    state.round
                ));
                let final_response = self.call_model(&system, &messages, None, &mut output).await?;
                output.answer = final_response.text_content();
                return Ok(output);
            }
        }

        Err(GenerateError::RoundsExhausted(MAX_TOOL_ROUNDS))
    }

    async fn call_model(
        &self,
        system: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
        output: &mut GenerationOutput,
    ) -> Result<ModelResponse, GenerateError> {
        let mut request = CompletionRequest::new(system, messages.to_vec())
            .with_sampling(self.temperature, self.max_tokens);
        if let Some(tools) = tools {
            request = request.with_tools(tools.to_vec());
        }

        output.model_calls += 1;
        self.logger.info(&format!(
            "[ToolOrchestrator] Model call {} via {}: {} messages, tools offered={}",
            output.model_calls,
            self.client.name(),
            messages.len(),
            request.offers_tools()
        ));

        self.client.complete(request).await.map_err(|e| {
            self.logger.error(&format!("[ToolOrchestrator] Model call failed: {}", e));
            GenerateError::from(e)
        })
    }

    /// Append the tool-use message and a single message with one result per call
    async fn execute_tools(
        &self,
        response: &ModelResponse,
        registry: &ToolRegistry,
        messages: &mut Vec<ChatMessage>,
        output: &mut GenerationOutput,
    ) {
        messages.push(response.to_message());

        let calls = response.tool_calls();
        let outcomes = registry.execute_tool_calls(&calls).await;
        output.tool_dispatches += outcomes.len();

        let mut results = Vec::with_capacity(calls.len());
        for (call, outcome) in calls.iter().zip(outcomes) {
            results.push(outcome.to_result(call.id.clone()));
            output.sources.extend(outcome.sources);
        }

        messages.push(ChatMessage::tool_results(results));
    }
}

impl std::fmt::Debug for ToolOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolOrchestrator")
            .field("client", &self.client.name())
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
