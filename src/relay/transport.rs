//! The transport trait this core consumes relays through.

use chrono::{DateTime, Utc};

use super::error::TransportResult;
use super::types::{PublishOutcome, RelayEvent};
use crate::circle::types::{KeyPackageBundle, MemberId};

/// Relay publish and fetch operations.
///
/// Implementations own connection management, subscriptions, retries within
/// a single call, and per-call timeouts. Fetches return sealed events; the
/// caller decides what to decrypt.
#[async_trait::async_trait]
pub trait RelayTransport: Send + Sync {
    /// Publishes a sealed event to the given relay set.
    ///
    /// Returns the per-relay acceptance partitions. An `Err` means the
    /// publish could not be attempted at all (e.g. no connectivity).
    async fn publish(
        &self,
        event: &RelayEvent,
        relays: &[String],
    ) -> TransportResult<PublishOutcome>;

    /// Fetches sealed events addressed to the given member, optionally
    /// bounded to events created at or after `since`.
    async fn fetch_addressed_to(
        &self,
        recipient: &MemberId,
        relays: &[String],
        since: Option<DateTime<Utc>>,
    ) -> TransportResult<Vec<RelayEvent>>;

    /// Fetches sealed group events routed under the given public group
    /// handle, optionally bounded to events created at or after `since`.
    async fn fetch_group_events(
        &self,
        public_group_id: &[u8; 32],
        relays: &[String],
        since: Option<DateTime<Utc>>,
    ) -> TransportResult<Vec<RelayEvent>>;

    /// Fetches a member's published key bundle.
    ///
    /// Returns `Ok(None)` when the member has no published bundle - a
    /// terminal condition distinct from the lookup itself failing.
    async fn fetch_key_bundle(
        &self,
        member: &MemberId,
    ) -> TransportResult<Option<KeyPackageBundle>>;
}
