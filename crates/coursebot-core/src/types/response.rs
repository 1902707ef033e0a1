//! Model completion response types

use serde::{Deserialize, Serialize};

use super::message::{ChatMessage, ContentPart, MessageRole};
use super::tool::ToolCall;

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Ordinary end of turn
    #[default]
    EndTurn,
    /// The model asked for one or more tools
    ToolUse,
    /// Output was cut off at the token limit
    MaxTokens,
}

/// One completion returned by a model client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Stop indicator reported by the provider
    pub stop_reason: StopReason,
    /// Ordered content blocks (text and tool-use only)
    pub content: Vec<ContentPart>,
}

impl ModelResponse {
    /// A plain text response
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            stop_reason: StopReason::EndTurn,
            content: vec![ContentPart::text(text)],
        }
    }

    /// A response requesting the given tool calls
    pub fn tool_use(calls: Vec<ToolCall>) -> Self {
        Self {
            stop_reason: StopReason::ToolUse,
            content: calls.into_iter().map(ContentPart::from).collect(),
        }
    }

    /// Add a leading text block (models often narrate before calling tools)
    pub fn with_preamble(mut self, text: impl Into<String>) -> Self {
        self.content.insert(0, ContentPart::text(text));
        self
    }

    /// Concatenated text of all text blocks
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Tool calls in the order the model issued them
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content.iter().filter_map(ContentPart::as_tool_call).collect()
    }

    /// Whether this response asks for tool execution.
    ///
    /// Decided by the presence of tool-use blocks; the stop reason is advisory.
    pub fn requests_tool_use(&self) -> bool {
        self.content
            .iter()
            .any(|part| matches!(part, ContentPart::ToolUse { .. }))
    }

    /// The assistant message to append to the conversation
    pub fn to_message(&self) -> ChatMessage {
        ChatMessage::with_parts(MessageRole::Assistant, self.content.clone())
    }
}
