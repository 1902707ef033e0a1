//! Coursebot Core
//!
//! Tool-augmented answer generation over course materials. A language model
//! may call tools for up to two rounds per query; a third, tool-less call
//! forces an answer if it keeps asking.
//!
//! ## Layout
//!
//! - `tools`: the `Tool` contract, the `ToolRegistry` and the built-in
//!   content-search and course-outline tools
//! - `orchestrator`: the round-bounded `ToolOrchestrator`
//! - `providers`: the `ModelClient` contract, a genai-backed client and a mock
//! - `search`: the search backend contract the built-in tools consume
//! - `session`, `assistant`, `config`, `logging`: everything around a query
//!
//! ```rust,ignore
//! use coursebot_core::{CourseAssistant, AssistantConfig, MemorySearchStore};
//!
//! let config = AssistantConfig::default();
//! let store = Arc::new(MemorySearchStore::new(config.search.max_results));
//! let assistant = CourseAssistant::from_config(&config, store, logger)?;
//!
//! let session = assistant.sessions().create_session();
//! let (answer, sources) = assistant.query("What is covered in lesson 2?", Some(&session)).await?;
//! ```

pub mod types;
pub mod logging;
pub mod config;
pub mod search;
pub mod tools;
pub mod providers;
pub mod orchestrator;
pub mod session;
pub mod assistant;

// Re-export commonly used types
pub use types::{
    ChatMessage, ContentPart, MessageContent, MessageRole, ModelResponse, Source, StopReason,
    ToolCall, ToolChoice, ToolDefinition, ToolResult,
};

pub use logging::{ConsoleLogger, Logger, MemoryLogger, NoOpLogger};

pub use config::{AssistantConfig, ConfigError, FileConfigProvider};

pub use search::{CourseMetadata, LessonMetadata, MemorySearchStore, SearchBackend, SearchResults};

pub use tools::{
    CourseOutlineTool, CourseSearchTool, RegistryError, Tool, ToolError, ToolOutcome, ToolOutput,
    ToolRegistry,
};

pub use providers::{
    CompletionRequest, GenaiModelClient, MockModelClient, ModelClient, ProviderError,
};

pub use orchestrator::{GenerateError, GenerationOutput, ToolOrchestrator, MAX_TOOL_ROUNDS};

pub use session::SessionManager;

pub use assistant::{AssistantError, CourseAnalytics, CourseAssistant};
