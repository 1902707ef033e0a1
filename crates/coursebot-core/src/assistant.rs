//! Course assistant facade
//!
//! Wires the built-in tools, the orchestrator and the session store together
//! and owns the per-query discipline the registry relies on: one top-level
//! query at a time, with sources read and reset at the query boundary.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::{AssistantConfig, ConfigError};
use crate::logging::{Logger, LoggerExt, NoOpLogger};
use crate::orchestrator::{GenerateError, ToolOrchestrator};
use crate::providers::{create_model_client, ModelClient, ProviderError};
use crate::search::SearchBackend;
use crate::session::SessionManager;
use crate::tools::{CourseOutlineTool, CourseSearchTool, RegistryError, ToolRegistry};
use crate::types::Source;

/// Errors surfaced by the assistant
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Catalog summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseAnalytics {
    pub total_courses: usize,
    pub course_titles: Vec<String>,
}

/// Answers questions about course materials
pub struct CourseAssistant {
    orchestrator: ToolOrchestrator,
    registry: ToolRegistry,
    sessions: SessionManager,
    store: Arc<dyn SearchBackend>,
    query_lock: Mutex<()>,
    logger: Arc<dyn Logger>,
}

impl CourseAssistant {
    /// Build an assistant around an existing model client
    pub fn new(
        config: &AssistantConfig,
        client: Arc<dyn ModelClient>,
        store: Arc<dyn SearchBackend>,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, AssistantError> {
        config.validate()?;

        let mut registry = ToolRegistry::new(Arc::clone(&logger));
        registry.register(CourseSearchTool::new(Arc::clone(&store)))?;
        registry.register(CourseOutlineTool::new(Arc::clone(&store)))?;

        let mut orchestrator = ToolOrchestrator::new(client)
            .with_sampling(config.model.temperature, config.model.max_tokens)
            .with_logger(Arc::clone(&logger));
        if let Some(prompt) = &config.system_prompt {
            orchestrator = orchestrator.with_system_prompt(prompt);
        }

        Ok(Self {
            orchestrator,
            registry,
            sessions: SessionManager::new(config.session.max_history),
            store,
            query_lock: Mutex::new(()),
            logger,
        })
    }

    /// Build an assistant whose model client comes from the config
    pub fn from_config(
        config: &AssistantConfig,
        store: Arc<dyn SearchBackend>,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, AssistantError> {
        let client = create_model_client(config.provider_config(), Arc::clone(&logger))?;
        Self::new(config, client, store, logger)
    }

    /// An assistant with default settings and no logging
    pub fn with_defaults(
        client: Arc<dyn ModelClient>,
        store: Arc<dyn SearchBackend>,
    ) -> Result<Self, AssistantError> {
        Self::new(&AssistantConfig::default(), client, store, Arc::new(NoOpLogger))
    }

    /// Answer `query`, returning the answer and the sources behind it.
    ///
    /// With a session id, earlier exchanges are passed along as history and
    /// this exchange is recorded.
    pub async fn query(
        &self,
        query: &str,
        session_id: Option<&str>,
    ) -> Result<(String, Vec<Source>), AssistantError> {
        let _guard = self.query_lock.lock().await;

        let prompt = format!("Answer this question about course materials: {}", query);
        let history = session_id.and_then(|id| self.sessions.get_conversation_history(id));
        let definitions = self.registry.definitions();

        self.logger.info_fmt(format_args!(
            "[CourseAssistant] Query (session={}): {}",
            session_id.unwrap_or("-"),
            query
        ));

        let result = self
            .orchestrator
            .generate(
                &prompt,
                history.as_deref(),
                Some(definitions.as_slice()),
                Some(&self.registry),
            )
            .await;

        let sources = self.registry.last_sources();
        self.registry.reset_sources();
        let answer = result?;

        if let Some(id) = session_id {
            self.sessions.add_exchange(id, query, &answer);
        }

        Ok((answer, sources))
    }

    /// Number of courses and their titles
    pub async fn course_analytics(&self) -> CourseAnalytics {
        let course_titles: Vec<String> = self
            .store
            .all_courses_metadata()
            .await
            .into_iter()
            .map(|c| c.title)
            .collect();

        CourseAnalytics {
            total_courses: course_titles.len(),
            course_titles,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

impl std::fmt::Debug for CourseAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourseAssistant")
            .field("orchestrator", &self.orchestrator)
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::providers::{MockModelClient, MockReply};
    use crate::search::{CourseChunk, CourseMetadata, LessonMetadata, MemorySearchStore};
    use crate::tools::{OUTLINE_TOOL_NAME, SEARCH_TOOL_NAME};
    use crate::types::{ModelResponse, ToolCall};

    fn store() -> Arc<MemorySearchStore> {
        let store = MemorySearchStore::new(5);
        store.add_course(
            CourseMetadata::new("Introduction to MCP")
                .with_link("https://example.com/mcp")
                .with_lesson(LessonMetadata::new(1, "What is MCP").with_link("https://example.com/mcp/1")),
        );
        store.add_course(CourseMetadata::new("Python Basics"));
        store.add_chunk(CourseChunk::new(
            "Introduction to MCP",
            Some(1),
            "MCP connects models to tools and data.",
        ));
        Arc::new(store)
    }

    fn search_then_answer(answer: &str) -> MockModelClient {
        MockModelClient::scripted([
            MockReply::Response(ModelResponse::tool_use(vec![ToolCall::new(
                "call_1",
                SEARCH_TOOL_NAME,
                json!({"query": "MCP tools", "course_name": "MCP"}),
            )])),
            MockReply::Response(ModelResponse::text(answer)),
        ])
    }

    #[tokio::test]
    async fn test_registers_builtin_tools() {
        let assistant =
            CourseAssistant::with_defaults(Arc::new(MockModelClient::echo()), store()).unwrap();
        assert_eq!(
            assistant.registry().tool_names(),
            vec![SEARCH_TOOL_NAME, OUTLINE_TOOL_NAME]
        );
    }

    #[tokio::test]
    async fn test_query_returns_sources_and_resets() {
        let client = Arc::new(search_then_answer("MCP links models to tools."));
        let assistant = CourseAssistant::with_defaults(client.clone(), store()).unwrap();

        let (answer, sources) = assistant.query("How does MCP work?", None).await.unwrap();

        assert_eq!(answer, "MCP links models to tools.");
        assert_eq!(
            sources,
            vec![Source::with_link(
                "Introduction to MCP - Lesson 1",
                Some("https://example.com/mcp/1".into())
            )]
        );
        assert!(assistant.registry().last_sources().is_empty());

        let first = &client.requests()[0];
        assert_eq!(
            first.messages[0].text(),
            Some("Answer this question about course materials: How does MCP work?")
        );
    }

    #[tokio::test]
    async fn test_session_history_is_recorded_and_replayed() {
        let client = Arc::new(MockModelClient::fixed("Sure."));
        let assistant = CourseAssistant::with_defaults(client.clone(), store()).unwrap();
        let session = assistant.sessions().create_session();

        assistant.query("First question", Some(&session)).await.unwrap();
        assistant.query("Follow-up question", Some(&session)).await.unwrap();

        let requests = client.requests();
        assert!(!requests[0].system.contains("Previous conversation"));
        assert!(requests[1]
            .system
            .ends_with("Previous conversation:\nUser: First question\nAssistant: Sure."));
    }

    #[tokio::test]
    async fn test_model_failure_still_resets_sources() {
        let client = Arc::new(MockModelClient::scripted([
            MockReply::Response(ModelResponse::tool_use(vec![ToolCall::new(
                "call_1",
                SEARCH_TOOL_NAME,
                json!({"query": "MCP"}),
            )])),
            MockReply::Error("overloaded".into()),
        ]));
        let assistant = CourseAssistant::with_defaults(client, store()).unwrap();
        let session = assistant.sessions().create_session();

        let result = assistant.query("What is MCP?", Some(&session)).await;

        assert!(matches!(result, Err(AssistantError::Generate(_))));
        assert!(assistant.registry().last_sources().is_empty());
        assert!(assistant.sessions().get_conversation_history(&session).is_none());
    }

    #[tokio::test]
    async fn test_course_analytics() {
        let assistant =
            CourseAssistant::with_defaults(Arc::new(MockModelClient::echo()), store()).unwrap();
        let analytics = assistant.course_analytics().await;
        assert_eq!(analytics.total_courses, 2);
        assert_eq!(
            analytics.course_titles,
            vec!["Introduction to MCP".to_string(), "Python Basics".to_string()]
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = AssistantConfig::default();
        config.search.max_results = 0;
        let result = CourseAssistant::new(
            &config,
            Arc::new(MockModelClient::echo()),
            store(),
            Arc::new(NoOpLogger),
        );
        assert!(matches!(result, Err(AssistantError::Config(_))));
    }

    #[test]
    fn test_mock_provider_from_config() {
        let mut config = AssistantConfig::default();
        config.model.provider = "mock".into();
        assert!(CourseAssistant::from_config(&config, store(), Arc::new(NoOpLogger)).is_ok());
    }
}
