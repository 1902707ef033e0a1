//! Conversation sessions
//!
//! Sessions hold the recent exchanges of one user and render them as the
//! opaque history text the orchestrator appends to its system content.

mod manager;

pub use manager::{SessionManager, SessionMessage, DEFAULT_MAX_HISTORY};
