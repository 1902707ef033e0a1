//! Round-bounded tool-calling orchestration
//!
//! ```text
//! INIT ─▶ AWAIT_MODEL ─┬─▶ DONE                     (no tool-use blocks)
//!                      └─▶ EXECUTE_TOOLS ─▶ AWAIT_MODEL ─┬─▶ DONE
//!                                                        └─▶ EXECUTE_TOOLS ─▶ FINAL ─▶ DONE
//! ```
//!
//! Tools are advertised on the first call only. A second request for tools
//! is still served, then one last call is made with no tools offered, so a
//! query costs at most three model calls.

mod error;
mod generator;
mod prompt;

pub use error::GenerateError;
pub use generator::{GenerationOutput, RoundState, ToolOrchestrator, MAX_TOOL_ROUNDS};
pub use prompt::{build_system_content, DEFAULT_SYSTEM_PROMPT};
