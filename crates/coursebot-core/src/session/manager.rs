//! In-memory session manager

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::types::MessageRole;

/// Exchanges kept per session
pub const DEFAULT_MAX_HISTORY: usize = 2;

/// One remembered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMessage {
    pub role: MessageRole,
    pub content: String,
}

impl SessionMessage {
    fn render(&self) -> String {
        match self.role {
            MessageRole::User => format!("User: {}", self.content),
            MessageRole::Assistant => format!("Assistant: {}", self.content),
        }
    }
}

#[derive(Debug, Default)]
struct Sessions {
    counter: u64,
    messages: HashMap<String, Vec<SessionMessage>>,
}

/// Keeps the last `max_history` exchanges of every session
#[derive(Debug)]
pub struct SessionManager {
    max_history: usize,
    inner: Mutex<Sessions>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl SessionManager {
    pub fn new(max_history: usize) -> Self {
        Self {
            max_history,
            inner: Mutex::new(Sessions::default()),
        }
    }

    /// Start a new, empty session and return its id
    pub fn create_session(&self) -> String {
        let mut inner = self.inner.lock();
        inner.counter += 1;
        let id = format!("session_{}", inner.counter);
        inner.messages.insert(id.clone(), Vec::new());
        id
    }

    /// Append a message, creating the session if needed
    pub fn add_message(&self, session_id: &str, role: MessageRole, content: impl Into<String>) {
        let limit = self.max_history * 2;
        let mut inner = self.inner.lock();
        let messages = inner.messages.entry(session_id.to_string()).or_default();
        messages.push(SessionMessage {
            role,
            content: content.into(),
        });
        if messages.len() > limit {
            let excess = messages.len() - limit;
            messages.drain(..excess);
        }
    }

    /// Record a question and its answer
    pub fn add_exchange(&self, session_id: &str, user_message: &str, assistant_message: &str) {
        self.add_message(session_id, MessageRole::User, user_message);
        self.add_message(session_id, MessageRole::Assistant, assistant_message);
    }

    /// Rendered history, or `None` for unknown or empty sessions
    pub fn get_conversation_history(&self, session_id: &str) -> Option<String> {
        let inner = self.inner.lock();
        let messages = inner.messages.get(session_id)?;
        if messages.is_empty() {
            return None;
        }
        Some(
            messages
                .iter()
                .map(SessionMessage::render)
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    /// Forget every message of a session, keeping the id valid
    pub fn clear_session(&self, session_id: &str) {
        if let Some(messages) = self.inner.lock().messages.get_mut(session_id) {
            messages.clear();
        }
    }

    pub fn session_count(&self) -> usize {
        self.inner.lock().messages.len()
    }
}
