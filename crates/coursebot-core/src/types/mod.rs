//! Core types for model interactions
//!
//! This module contains the shared types used by the orchestrator, the tool
//! registry and the model clients.

mod message;
mod response;
mod source;
mod tool;

pub use message::{ChatMessage, ContentPart, MessageContent, MessageRole};
pub use response::{ModelResponse, StopReason};
pub use source::Source;
pub use tool::{ToolCall, ToolChoice, ToolDefinition, ToolResult};
