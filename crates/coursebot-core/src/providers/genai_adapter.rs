//! Adapter between coursebot types and genai types
//!
//! Conversation messages carry tool-use and tool-result blocks inline; genai
//! models those as dedicated messages, so one of ours may expand to several.

use std::collections::HashMap;
use std::env;

use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions as GenaiOptions, ChatRequest, ChatResponse, Tool as GenaiTool,
    ToolCall as GenaiToolCall, ToolResponse as GenaiToolResponse,
};
use genai::resolver::{AuthData, AuthResolver, Endpoint, ServiceTargetResolver};
use genai::{adapter::AdapterKind, Client, ModelIden, ServiceTarget};
use once_cell::sync::Lazy;
use serde_json::json;

use crate::types::{
    ChatMessage, ContentPart, MessageContent, MessageRole, ModelResponse, ToolCall, ToolChoice,
    ToolDefinition,
};

use super::error::{ProviderError, ProviderResult};
use super::traits::{CompletionRequest, ProviderModelConfig};

/// Mapping from provider names to the environment variables holding their keys
static ENV_VAR_MAP: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("openai", vec!["OPENAI_API_KEY"]);
    m.insert("anthropic", vec!["ANTHROPIC_API_KEY"]);
    m.insert("gemini", vec!["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("groq", vec!["GROQ_API_KEY"]);
    m.insert("deepseek", vec!["DEEPSEEK_API_KEY"]);
    m.insert("xai", vec!["XAI_API_KEY"]);
    m.insert("mistral", vec!["MISTRAL_API_KEY"]);
    m.insert("openrouter", vec!["OPENROUTER_API_KEY"]);
    m.insert("ollama", vec![]);
    m
});

// ============================================================================
// Message Conversion: coursebot -> genai
// ============================================================================

/// Build a genai tool call from our tool-use block
pub fn to_genai_tool_call(id: &str, name: &str, input: &serde_json::Value) -> ProviderResult<GenaiToolCall> {
    let call = serde_json::from_value(json!({
        "call_id": id,
        "fn_name": name,
        "fn_arguments": input,
    }))?;
    Ok(call)
}

/// Convert one message into the genai messages it stands for
///
/// Tool-use blocks become a single assistant tool-call message (any text
/// preamble alongside them is dropped). Each tool-result block becomes its
/// own tool-response message, in order.
pub fn to_genai_message(msg: ChatMessage) -> ProviderResult<Vec<GenaiMessage>> {
    let parts = match msg.content {
        MessageContent::Text(text) => {
            return Ok(vec![match msg.role {
                MessageRole::User => GenaiMessage::user(text),
                MessageRole::Assistant => GenaiMessage::assistant(text),
            }]);
        }
        MessageContent::Parts(parts) => parts,
    };

    let mut texts = Vec::new();
    let mut calls = Vec::new();
    let mut responses = Vec::new();

    for part in parts {
        match part {
            ContentPart::Text { text } => texts.push(text),
            ContentPart::ToolUse { id, name, input } => {
                calls.push(to_genai_tool_call(&id, &name, &input)?);
            }
            ContentPart::ToolResult { tool_use_id, content, .. } => {
                responses.push(GenaiMessage::from(GenaiToolResponse::new(tool_use_id, content)));
            }
        }
    }

    let mut out = Vec::new();
    if !calls.is_empty() {
        out.push(GenaiMessage::from(calls));
    } else if !texts.is_empty() {
        let text = texts.join("\n");
        out.push(match msg.role {
            MessageRole::User => GenaiMessage::user(text),
            MessageRole::Assistant => GenaiMessage::assistant(text),
        });
    }
    out.extend(responses);
    Ok(out)
}

/// Convert a vector of messages to genai messages
pub fn to_genai_messages(messages: Vec<ChatMessage>) -> ProviderResult<Vec<GenaiMessage>> {
    let mut out = Vec::with_capacity(messages.len());
    for msg in messages {
        out.extend(to_genai_message(msg)?);
    }
    Ok(out)
}

// ============================================================================
// Tool and Options Conversion
// ============================================================================

/// Convert a tool definition to a genai Tool
pub fn to_genai_tool(tool: ToolDefinition) -> GenaiTool {
    GenaiTool::new(&tool.name)
        .with_description(&tool.description)
        .with_schema(tool.input_schema)
}

/// Convert tool definitions to genai tools
pub fn to_genai_tools(tools: Vec<ToolDefinition>) -> Vec<GenaiTool> {
    tools.into_iter().map(to_genai_tool).collect()
}

/// Build the genai chat request for one completion.
///
/// genai requests carry no tool-choice field; providers treat offered tools as
/// `auto`, which is the only choice coursebot makes. Tools are attached only
/// when at least one is offered.
pub fn to_genai_request(request: CompletionRequest) -> ProviderResult<ChatRequest> {
    let mut chat_req = ChatRequest::new(to_genai_messages(request.messages)?).with_system(request.system);

    if let Some(tools) = request.tools.filter(|t| !t.is_empty()) {
        match request.tool_choice.unwrap_or_default() {
            ToolChoice::Auto => chat_req = chat_req.with_tools(to_genai_tools(tools)),
        }
    }
    Ok(chat_req)
}
/// Sampling options for a request
pub fn to_genai_options(request: &CompletionRequest) -> GenaiOptions {
    GenaiOptions::default()
        .with_temperature(request.temperature as f64)
        .with_max_tokens(request.max_tokens)
}

// ============================================================================
// Response Conversion: genai -> coursebot
// ============================================================================

/// Convert genai ToolCall to our ToolCall
pub fn from_genai_tool_call(tc: GenaiToolCall) -> ToolCall {
    ToolCall::new(tc.call_id, tc.fn_name, tc.fn_arguments)
}

/// Convert a genai chat response to a model response
pub fn from_genai_response(response: ChatResponse) -> ModelResponse {
    // All text parts, not just the first
    let text = response.texts().concat();
    let calls: Vec<ToolCall> = response
        .into_tool_calls()
        .into_iter()
        .map(from_genai_tool_call)
        .collect();

    if calls.is_empty() {
        return ModelResponse::text(text);
    }

    let mut out = ModelResponse::tool_use(calls);
    if !text.trim().is_empty() {
        out = out.with_preamble(text);
    }
    out
}

/// Map a genai error into a provider error
pub fn from_genai_error(provider: &str, err: genai::Error) -> ProviderError {
    let message = err.to_string();
    if message.contains("429") || message.to_lowercase().contains("rate limit") {
        ProviderError::rate_limited(provider, message)
    } else {
        ProviderError::api_error(provider, 500, message)
    }
}

// ============================================================================
// Client Creation with Custom Auth
// ============================================================================

/// Look up a provider's API key from the environment
pub fn api_key_from_env(provider: &str) -> Option<String> {
    let provider = provider.to_lowercase();
    let fallback = format!("{}_API_KEY", provider.to_uppercase());
    let names: Vec<&str> = match ENV_VAR_MAP.get(provider.as_str()) {
        Some(names) => names.clone(),
        None => vec![fallback.as_str()],
    };

    names
        .into_iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.is_empty())
}

/// Whether the provider speaks the OpenAI protocol at a non-default endpoint
fn openai_compatible_endpoint(provider: &str) -> Option<&'static str> {
    match provider {
        "openrouter" => Some("https://openrouter.ai/api/v1/"),
        "mistral" => Some("https://api.mistral.ai/v1/"),
        _ => None,
    }
}

/// Create a genai Client with explicit auth and endpoint resolution
///
/// An explicit API key in the config wins; otherwise the provider's
/// environment variables are consulted.
pub fn create_client(config: &ProviderModelConfig) -> Client {
    let provider = config.provider.to_lowercase();
    let explicit_api_key = config.api_key.clone();
    let api_base = config.api_base.clone();

    let auth_provider = provider.clone();
    let auth_resolver = AuthResolver::from_resolver_fn(
        move |_model_iden: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
            if let Some(key) = explicit_api_key.clone() {
                return Ok(Some(AuthData::from_single(key)));
            }
            // None lets genai handle providers that need no auth (ollama)
            Ok(api_key_from_env(&auth_provider).map(AuthData::from_single))
        },
    );

    let target_provider = provider;
    let target_resolver = ServiceTargetResolver::from_resolver_fn(
        move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            let compat = openai_compatible_endpoint(&target_provider);
            if api_base.is_none() && compat.is_none() {
                return Ok(target);
            }

            let ServiceTarget { endpoint, auth, model } = target;
            let endpoint = match (&api_base, compat) {
                (Some(base), _) => Endpoint::from_owned(base.clone()),
                (None, Some(url)) => Endpoint::from_static(url),
                (None, None) => endpoint,
            };
            let model = if compat.is_some() {
                ModelIden::new(AdapterKind::OpenAI, model.model_name.clone())
            } else {
                model
            };

            Ok(ServiceTarget { endpoint, auth, model })
        },
    );

    Client::builder()
        .with_auth_resolver(auth_resolver)
        .with_service_target_resolver(target_resolver)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StopReason, ToolResult};

    #[test]
    fn test_text_message_conversion() {
        let converted = to_genai_message(ChatMessage::user("Hello, world!")).unwrap();
        assert_eq!(converted.len(), 1);
    }

    #[test]
    fn test_tool_use_message_conversion() {
        let response = ModelResponse::tool_use(vec![
            ToolCall::new("c1", "search_course_content", json!({"query": "a"})),
            ToolCall::new("c2", "get_course_outline", json!({"course_title": "b"})),
        ])
        .with_preamble("Let me look.");

        let converted = to_genai_message(response.to_message()).unwrap();
        assert_eq!(converted.len(), 1);
    }

    #[test]
    fn test_tool_results_expand_per_result() {
        let msg = ChatMessage::tool_results(vec![
            ToolResult::success("c1", "one"),
            ToolResult::error("c2", "two"),
        ]);
        let converted = to_genai_message(msg).unwrap();
        assert_eq!(converted.len(), 2);
    }

    #[test]
    fn test_tool_call_round_trip() {
        let call = to_genai_tool_call("c1", "lookup", &json!({"q": 1})).unwrap();
        let back = from_genai_tool_call(call);
        assert_eq!(back, ToolCall::new("c1", "lookup", json!({"q": 1})));
    }

    fn genai_response(parts: Vec<genai::chat::ContentPart>) -> ChatResponse {
        let model = ModelIden::new(AdapterKind::Anthropic, "claude-test");
        ChatResponse {
            content: genai::chat::MessageContent::from_parts(parts),
            reasoning_content: None,
            model_iden: model.clone(),
            provider_model_iden: model,
            usage: genai::chat::Usage::default(),
            captured_raw_body: None,
        }
    }

    #[test]
    fn test_text_response_conversion() {
        let response = from_genai_response(genai_response(vec![
            genai::chat::ContentPart::from_text("Four"),
            genai::chat::ContentPart::from_text(" lessons."),
        ]));
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert!(!response.requests_tool_use());
        assert_eq!(response.text_content(), "Four lessons.");

        let empty = from_genai_response(genai_response(vec![]));
        assert!(!empty.requests_tool_use());
        assert_eq!(empty.text_content(), "");
    }

    #[test]
    fn test_tool_call_response_conversion() {
        let first = to_genai_tool_call("call_1", "search_course_content", &json!({"query": "mcp"})).unwrap();
        let second = to_genai_tool_call("call_2", "get_course_outline", &json!({"course_name": "MCP"})).unwrap();

        let response = from_genai_response(genai_response(vec![
            genai::chat::ContentPart::from_text("Let me look that up."),
            genai::chat::ContentPart::ToolCall(first),
            genai::chat::ContentPart::ToolCall(second),
        ]));

        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert!(response.requests_tool_use());
        assert!(matches!(&response.content[0], ContentPart::Text { text } if text == "Let me look that up."));
        assert_eq!(
            response.tool_calls(),
            vec![
                ToolCall::new("call_1", "search_course_content", json!({"query": "mcp"})),
                ToolCall::new("call_2", "get_course_outline", json!({"course_name": "MCP"})),
            ]
        );
    }

    #[test]
    fn test_blank_text_before_tool_calls_is_dropped() {
        let call = to_genai_tool_call("call_1", "search_course_content", &json!({"query": "mcp"})).unwrap();
        let response = from_genai_response(genai_response(vec![
            genai::chat::ContentPart::from_text("  \n"),
            genai::chat::ContentPart::ToolCall(call),
        ]));

        assert_eq!(response.content.len(), 1);
        assert!(matches!(&response.content[0], ContentPart::ToolUse { .. }));
        assert_eq!(response.text_content(), "");
    }

    #[test]
    fn test_request_attaches_only_offered_tools() {
        let tools = vec![ToolDefinition::new("search_course_content", "Search course materials")];

        let offered = CompletionRequest::new("sys", vec![ChatMessage::user("What is MCP?")])
            .with_tools(tools);
        let chat_req = to_genai_request(offered).unwrap();
        assert_eq!(chat_req.system.as_deref(), Some("sys"));
        assert_eq!(chat_req.messages.len(), 1);
        let names: Vec<String> = chat_req.tools.unwrap().into_iter().map(|t| t.name.to_string()).collect();
        assert_eq!(names, vec!["search_course_content"]);

        let plain = CompletionRequest::new("sys", vec![ChatMessage::user("hi")]);
        assert!(to_genai_request(plain).unwrap().tools.is_none());

        let empty = CompletionRequest::new("sys", vec![ChatMessage::user("hi")]).with_tools(vec![]);
        assert!(to_genai_request(empty).unwrap().tools.is_none());
    }

    #[test]
    fn test_tool_conversion() {
        let tool = ToolDefinition::new("get_weather", "Get weather for a location")
            .with_schema(json!({
                "type": "object",
                "properties": { "location": { "type": "string" } }
            }));

        let genai_tool = to_genai_tool(tool);
        assert_eq!(genai_tool.name, "get_weather");
    }

    #[test]
    fn test_openai_compatible_endpoints() {
        assert!(openai_compatible_endpoint("openrouter").is_some());
        assert!(openai_compatible_endpoint("anthropic").is_none());
    }

    #[test]
    fn test_unknown_provider_env_fallback() {
        env::set_var("COURSEBOT_TEST_PROVIDER_API_KEY", "secret");
        assert_eq!(
            api_key_from_env("coursebot_test_provider").as_deref(),
            Some("secret")
        );
        env::remove_var("COURSEBOT_TEST_PROVIDER_API_KEY");
    }
}
