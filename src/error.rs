//! Crate-level error taxonomy.
//!
//! All collaborator failures, however the engine or transport represents
//! them natively, are normalized here into three classes:
//!
//! - **Validation**: terminal, never retried automatically (e.g. a member
//!   has no published key bundle).
//! - **Network**: transient, surfaced distinctly so a caller may offer
//!   retry. Never silently collapsed into a validation failure.
//! - **Protocol**: a protocol-state failure of a whole operation (e.g.
//!   finalize after a partial invitation failure). Never partially applied.
//!
//! The `From` impls on [`CoreError`] are the single classification point:
//! call sites convert with `?` instead of matching collaborator error
//! shapes individually.

use thiserror::Error;

use crate::engine::EngineError;
use crate::relay::TransportError;

/// Error type for orchestration operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Terminal validation failure. Retrying without new input cannot help.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Transient network failure. The caller may offer retry.
    #[error("network failure: {0}")]
    Network(String),

    /// Protocol-state failure. The whole operation failed; no partial
    /// state was applied.
    #[error("protocol failure: {0}")]
    Protocol(String),
}

impl CoreError {
    /// Returns whether a caller may reasonably retry the failed operation
    /// without changing its input.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Engine failures are protocol failures: the group state machine could
/// not carry out the requested transition.
impl From<EngineError> for CoreError {
    fn from(err: EngineError) -> Self {
        Self::Protocol(err.to_string())
    }
}

/// Transport failures are transient network failures.
impl From<TransportError> for CoreError {
    fn from(err: TransportError) -> Self {
        Self::Network(err.to_string())
    }
}

/// Result type alias for orchestration operations.
pub type Result<T> = std::result::Result<T, CoreError>;
