//! Tool registry for dispatching model tool calls
//!
//! The ToolRegistry is the central component for:
//! - Registering tools under the name their definition declares
//! - Advertising definitions to the model in registration order
//! - Dispatching calls by name, converting every failure into text
//! - Tracking the sources produced by the most recent executions

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use thiserror::Error;

use crate::log_warn;
use crate::logging::{Logger, NoOpLogger};
use crate::types::{Source, ToolCall, ToolDefinition, ToolResult};

use super::traits::Tool;

/// Errors raised while registering a tool
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("Invalid tool: {0}")]
    InvalidTool(String),
}

/// Result of dispatching one call through the registry
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    /// Text shown to the model
    pub content: String,
    /// True for unknown tools and execution failures
    pub is_error: bool,
    /// Sources produced by this execution
    pub sources: Vec<Source>,
}

impl ToolOutcome {
    fn failure(content: String) -> Self {
        Self {
            content,
            is_error: true,
            sources: Vec::new(),
        }
    }

    /// Pair this outcome with the call it answers
    pub fn to_result(&self, call_id: impl Into<String>) -> ToolResult {
        ToolResult {
            call_id: call_id.into(),
            content: self.content.clone(),
            is_error: self.is_error,
        }
    }
}

struct RegisteredTool {
    definition: ToolDefinition,
    tool: Arc<dyn Tool>,
    /// Sources from this tool's last execution that produced any
    last_sources: RwLock<Vec<Source>>,
}

/// Registry of the tools available to the orchestrator
///
/// Source slots are last-writer-wins per tool. Concurrent top-level queries
/// against one registry race on them and must be serialized by the caller,
/// who also calls `reset_sources` between queries.
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
    logger: Arc<dyn Logger>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(Arc::new(NoOpLogger))
    }
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
            logger,
        }
    }

    /// Register a tool under its definition name
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), RegistryError> {
        self.register_arc(Arc::new(tool))
    }

    /// Register an already shared tool
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let definition = tool.definition();
        let name = definition.name.clone();
        if name.trim().is_empty() {
            return Err(RegistryError::InvalidTool(
                "Tool must have a 'name' in its definition".to_string(),
            ));
        }
        // The advertised name is the dispatch key, so it must round-trip exactly
        if name.trim() != name {
            return Err(RegistryError::InvalidTool(format!(
                "Tool name '{}' has surrounding whitespace",
                name
            )));
        }
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }

        self.logger.debug(&format!("[ToolRegistry] Registered tool: {}", name));
        self.index.insert(name, self.tools.len());
        self.tools.push(RegisteredTool {
            definition,
            tool,
            last_sources: RwLock::new(Vec::new()),
        });
        Ok(())
    }

    /// Definitions to advertise to the model, in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition.clone()).collect()
    }

    /// Names of registered tools, in registration order
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.definition.name.as_str()).collect()
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a call by name.
    ///
    /// Never fails: an unknown name or a tool error becomes an error-flagged
    /// outcome so the rest of the round can proceed.
    pub async fn dispatch(&self, name: &str, args: &Value) -> ToolOutcome {
        let Some(&position) = self.index.get(name) else {
            log_warn!(self.logger, "[ToolRegistry] Unknown tool requested: {}", name);
            return ToolOutcome::failure(format!("Tool '{}' not found", name));
        };
        let entry = &self.tools[position];

        self.logger.info(&format!("[ToolRegistry] Calling tool: {}", name));
        match entry.tool.execute(args).await {
            Ok(output) => {
                if !output.sources.is_empty() {
                    *entry.last_sources.write() = output.sources.clone();
                }
                self.logger.debug(&format!(
                    "[ToolRegistry] Tool {} returned {} chars, {} sources",
                    name,
                    output.content.len(),
                    output.sources.len()
                ));
                ToolOutcome {
                    content: output.content,
                    is_error: false,
                    sources: output.sources,
                }
            }
            Err(e) => {
                log_warn!(self.logger, "[ToolRegistry] Tool {} failed: {}", name, e);
                ToolOutcome::failure(format!("Tool execution failed: {}", e))
            }
        }
    }

    /// Dispatch several calls sequentially, one outcome per call in call order
    pub async fn execute_tool_calls(&self, tool_calls: &[ToolCall]) -> Vec<ToolOutcome> {
        let mut outcomes = Vec::with_capacity(tool_calls.len());
        for call in tool_calls {
            outcomes.push(self.dispatch(&call.name, &call.input).await);
        }
        outcomes
    }

    /// Sources accumulated since the last reset, in registration order
    pub fn last_sources(&self) -> Vec<Source> {
        self.tools
            .iter()
            .flat_map(|t| t.last_sources.read().clone())
            .collect()
    }

    /// Clear the source slots of every tool
    pub fn reset_sources(&self) {
        for tool in &self.tools {
            tool.last_sources.write().clear();
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryLogger;
    use crate::tools::{ToolError, ToolOutput};
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticTool {
        name: &'static str,
        reply: Result<ToolOutput, ToolError>,
    }

    #[async_trait]
    impl Tool for StaticTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new(self.name, "test tool")
        }

        async fn execute(&self, _args: &Value) -> Result<ToolOutput, ToolError> {
            self.reply.clone()
        }
    }

    fn ok_tool(name: &'static str, content: &str, sources: Vec<Source>) -> StaticTool {
        StaticTool {
            name,
            reply: Ok(ToolOutput::with_sources(content, sources)),
        }
    }

    #[test]
    fn test_register_rejects_duplicates_and_empty_names() {
        let mut registry = ToolRegistry::default();
        registry.register(ok_tool("search", "", vec![])).unwrap();

        assert_eq!(
            registry.register(ok_tool("search", "", vec![])),
            Err(RegistryError::DuplicateTool("search".to_string()))
        );
        assert!(matches!(
            registry.register(ok_tool("  ", "", vec![])),
            Err(RegistryError::InvalidTool(_))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_definitions_follow_registration_order() {
        let mut registry = ToolRegistry::default();
        registry.register(ok_tool("zeta", "", vec![])).unwrap();
        registry.register(ok_tool("alpha", "", vec![])).unwrap();

        let names: Vec<_> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(registry.tool_names(), vec!["zeta", "alpha"]);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_is_text() {
        let logger = Arc::new(MemoryLogger::new());
        let registry = ToolRegistry::new(logger.clone());

        let outcome = registry.dispatch("missing", &json!({})).await;
        assert_eq!(outcome.content, "Tool 'missing' not found");
        assert!(outcome.is_error);
        assert!(logger.messages_at("warn").iter().any(|m| m.contains("missing")));
    }

    #[tokio::test]
    async fn test_dispatch_contains_tool_failure() {
        let mut registry = ToolRegistry::default();
        registry
            .register(StaticTool {
                name: "broken",
                reply: Err(ToolError::Backend("index offline".to_string())),
            })
            .unwrap();

        let outcome = registry.dispatch("broken", &json!({})).await;
        assert_eq!(outcome.content, "Tool execution failed: index offline");
        assert!(outcome.is_error);
    }

    #[tokio::test]
    async fn test_execute_tool_calls_preserves_order() {
        let mut registry = ToolRegistry::default();
        registry.register(ok_tool("a", "from a", vec![])).unwrap();
        registry
            .register(ok_tool("b", "from b", vec![Source::new("Course B")]))
            .unwrap();

        let calls = vec![
            ToolCall::new("2", "b", json!({})),
            ToolCall::new("1", "a", json!({})),
            ToolCall::new("3", "c", json!({})),
        ];
        let outcomes = registry.execute_tool_calls(&calls).await;

        let results: Vec<ToolResult> = calls
            .iter()
            .zip(&outcomes)
            .map(|(call, outcome)| outcome.to_result(call.id.clone()))
            .collect();
        assert_eq!(
            results,
            vec![
                ToolResult::success("2", "from b"),
                ToolResult::success("1", "from a"),
                ToolResult::error("3", "Tool 'c' not found"),
            ]
        );
        assert_eq!(outcomes[0].sources, vec![Source::new("Course B")]);
        assert!(outcomes[1].sources.is_empty());
    }

    #[test]
    fn test_register_rejects_padded_names() {
        let mut registry = ToolRegistry::default();
        assert!(matches!(
            registry.register(ok_tool(" lookup ", "", vec![])),
            Err(RegistryError::InvalidTool(_))
        ));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_every_advertised_name_dispatches() {
        let mut registry = ToolRegistry::default();
        registry.register(ok_tool("lookup", "found", vec![])).unwrap();
        registry.register(ok_tool("outline", "outlined", vec![])).unwrap();
        let _ = registry.register(ok_tool("padded ", "never", vec![]));

        for definition in registry.definitions() {
            let outcome = registry.dispatch(&definition.name, &json!({})).await;
            assert!(!outcome.is_error, "{} did not dispatch", definition.name);
        }
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_sources_accumulate_and_reset() {
        let mut registry = ToolRegistry::default();
        registry
            .register(ok_tool("search", "hits", vec![Source::new("Course A - Lesson 1")]))
            .unwrap();
        registry
            .register(ok_tool("outline", "outline", vec![Source::new("Course B")]))
            .unwrap();
        registry.register(ok_tool("quiet", "nothing", vec![])).unwrap();

        assert!(registry.last_sources().is_empty());

        let outcome = registry.dispatch("outline", &json!({})).await;
        assert_eq!(outcome.sources, vec![Source::new("Course B")]);
        registry.dispatch("search", &json!({})).await;
        registry.dispatch("quiet", &json!({})).await;

        assert_eq!(
            registry.last_sources(),
            vec![Source::new("Course A - Lesson 1"), Source::new("Course B")]
        );

        registry.reset_sources();
        assert!(registry.last_sources().is_empty());
    }
}
