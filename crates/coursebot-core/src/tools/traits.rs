//! Tool trait and execution result types

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::types::{Source, ToolDefinition};

/// Errors a tool can raise while executing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Arguments missing, mistyped or otherwise unusable
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// A downstream lookup failed
    #[error("{0}")]
    Backend(String),
}

impl ToolError {
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments(message.into())
    }
}

/// Successful tool output: text for the model, sources for the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutput {
    pub content: String,
    pub sources: Vec<Source>,
}

impl ToolOutput {
    /// Output without provenance
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sources: Vec::new(),
        }
    }

    /// Output with the sources it was built from
    pub fn with_sources(content: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            content: content.into(),
            sources,
        }
    }
}

/// A named, schema-described capability the model can invoke
#[async_trait]
pub trait Tool: Send + Sync {
    /// Schema advertised to the model; `name` is the registry key
    fn definition(&self) -> ToolDefinition;

    /// Execute with the model-supplied arguments
    async fn execute(&self, args: &Value) -> Result<ToolOutput, ToolError>;
}

/// Deserialize tool arguments into a typed struct
pub fn parse_args<T: DeserializeOwned>(args: &Value) -> Result<T, ToolError> {
    serde_json::from_value(args.clone()).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Args {
        course_title: String,
    }

    #[test]
    fn test_parse_args() {
        let args: Args = parse_args(&json!({"course_title": "MCP"})).unwrap();
        assert_eq!(args.course_title, "MCP");

        let err = parse_args::<Args>(&json!({"title": "MCP"})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(ref m) if m.contains("course_title")));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ToolError::invalid_arguments("missing field `query`").to_string(),
            "invalid arguments: missing field `query`"
        );
        assert_eq!(ToolError::Backend("timeout".into()).to_string(), "timeout");
    }
}
