//! Relay transport contract and wire-facing types.
//!
//! The relay wire protocol (connection management, subscriptions, byte
//! formats) is owned by an external transport collaborator. This module
//! defines the narrow contract this core consumes it through:
//!
//! - [`RelayTransport`]: publish and fetch operations against relay sets
//! - [`RelayEvent`]: an opaque sealed event with a stable identifier
//! - [`PublishOutcome`]: per-relay acceptance partitions for one publish
//!
//! The orchestration layer never imposes its own timeouts; it interprets
//! the transport's success and failure signals.

mod error;
mod transport;
mod types;

pub use error::{TransportError, TransportResult};
pub use transport::RelayTransport;
pub use types::{EventId, PublishOutcome, RelayEvent};
