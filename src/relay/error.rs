//! Error type for the transport contract.

use thiserror::Error;

/// Opaque failure reported by the relay transport.
///
/// The transport's native failure signaling (timeouts, connection errors,
/// relay rejections) is flattened to a reason string at the contract
/// boundary; this core classifies every transport failure as transient
/// (see [`crate::error::CoreError`]).
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
    /// Creates a transport error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
