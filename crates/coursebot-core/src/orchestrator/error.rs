//! Generation error types

use thiserror::Error;

use crate::providers::ProviderError;

/// Errors surfaced by `ToolOrchestrator::generate`
///
/// Tool-layer problems never appear here; they are folded into the
/// conversation as error-flagged tool results.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The model call itself failed
    #[error("model call failed: {0}")]
    Provider(#[from] ProviderError),

    /// The round loop ended without producing an answer
    #[error("maximum rounds exceeded ({0})")]
    RoundsExhausted(usize),
}
