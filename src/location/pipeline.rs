//! Location sharing pipeline.
//!
//! Publish path: seal the local user's (already precision-reduced)
//! location for a circle via the engine, then publish it to the circle's
//! relay set. Fetch path: pull sealed group events since a watermark,
//! deduplicate, decrypt each independently, drop expired records, keep the
//! latest record per sender, and enrich with locally known display names.
//!
//! One bad event never aborts a batch: per-event failures are logged and
//! skipped, and the fetch returns whatever survived.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::dedup::SeenEvents;
use super::types::{IncomingLocation, LocationRecord, MemberLocation};
use crate::circle::types::{Circle, MemberId, MembershipStatus};
use crate::directory::LocalDirectory;
use crate::engine::{DecryptedEvent, GroupEngine};
use crate::error::{CoreError, Result};
use crate::relay::{PublishOutcome, RelayTransport};

/// Seconds subtracted from the fetch watermark to tolerate clock
/// disagreement between this device and relays. Fixed; duplicate
/// observations it causes are absorbed by the seen-event store.
const WATERMARK_SKEW_SECS: i64 = 60;

/// Encrypts and publishes the local user's location, and fetches,
/// deduplicates, and ages peer locations for a circle.
pub struct LocationPipeline {
    engine: Arc<dyn GroupEngine>,
    transport: Arc<dyn RelayTransport>,
    directory: Arc<dyn LocalDirectory>,
    seen: Arc<SeenEvents>,
}

impl LocationPipeline {
    /// Creates a pipeline with a fresh seen-event store.
    #[must_use]
    pub fn new(
        engine: Arc<dyn GroupEngine>,
        transport: Arc<dyn RelayTransport>,
        directory: Arc<dyn LocalDirectory>,
    ) -> Self {
        Self::with_seen_store(engine, transport, directory, Arc::new(SeenEvents::new()))
    }

    /// Creates a pipeline over an injected seen-event store.
    #[must_use]
    pub fn with_seen_store(
        engine: Arc<dyn GroupEngine>,
        transport: Arc<dyn RelayTransport>,
        directory: Arc<dyn LocalDirectory>,
        seen: Arc<SeenEvents>,
    ) -> Self {
        Self {
            engine,
            transport,
            directory,
            seen,
        }
    }

    /// Seals and publishes a location record to the circle's relay set.
    ///
    /// The publish succeeds if at least one target relay accepts the
    /// event; the returned outcome carries the per-relay partitions.
    ///
    /// # Errors
    ///
    /// Returns a protocol failure if sealing fails, a network failure if
    /// the publish could not be attempted or no relay accepted it.
    pub async fn publish_location(
        &self,
        circle: &Circle,
        sender: &MemberId,
        record: &LocationRecord,
    ) -> Result<PublishOutcome> {
        let event = self
            .engine
            .encrypt_location(&circle.group_id, sender, record)
            .await?;

        let outcome = self.transport.publish(&event, &circle.relays).await?;

        if outcome.is_success() {
            Ok(outcome)
        } else {
            Err(CoreError::Network(format!(
                "no relay accepted location event {}",
                outcome.event_id
            )))
        }
    }

    /// Fetches current peer locations for a circle.
    ///
    /// Returns the best-effort surviving set: one record per sender, the
    /// most recent by capture timestamp, unexpired, enriched with locally
    /// known display names. A circle the local user has not accepted
    /// membership in short-circuits to an empty result without any
    /// network call, as does a failed fetch.
    pub async fn fetch_circle_locations(
        &self,
        circle: &Circle,
        since: Option<DateTime<Utc>>,
    ) -> Vec<MemberLocation> {
        if circle.membership != MembershipStatus::Accepted {
            return Vec::new();
        }

        let adjusted_since = since.map(|t| t - Duration::seconds(WATERMARK_SKEW_SECS));

        let events = match self
            .transport
            .fetch_group_events(&circle.public_id, &circle.relays, adjusted_since)
            .await
        {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("group event fetch failed: {e}");
                return Vec::new();
            }
        };

        let now = Utc::now();
        let mut latest: HashMap<MemberId, IncomingLocation> = HashMap::new();

        // Sequential per-event processing serializes seen-set mutations,
        // so overlapping IDs inside one batch still dedup.
        for event in events {
            if self.seen.contains(&event.id) {
                continue;
            }

            let decrypted = match self.engine.decrypt_event(&circle.group_id, &event).await {
                Ok(result) => result,
                Err(e) => {
                    // Not marked seen: a transiently undecryptable event
                    // is retried on a later fetch.
                    tracing::warn!("decrypt failed for event {}: {e}", event.id);
                    continue;
                }
            };
            self.seen.mark(event.id.clone());

            let incoming = match decrypted {
                DecryptedEvent::Location(incoming) => incoming,
                DecryptedEvent::NonLocation => continue,
            };

            if !incoming.record.is_well_formed() {
                tracing::warn!("malformed location record from {}", incoming.sender);
                continue;
            }
            if incoming.record.is_expired(now) {
                continue;
            }

            match latest.entry(incoming.sender.clone()) {
                std::collections::hash_map::Entry::Occupied(mut entry) => {
                    if incoming.record.timestamp > entry.get().record.timestamp {
                        entry.insert(incoming);
                    }
                }
                std::collections::hash_map::Entry::Vacant(entry) => {
                    entry.insert(incoming);
                }
            }
        }

        latest
            .into_values()
            .map(|incoming| {
                let entry = self.directory.lookup(&incoming.sender);
                let freshness = incoming.record.freshness_at(now);
                MemberLocation {
                    member: incoming.sender,
                    display_name: entry.and_then(|e| e.display_name),
                    record: incoming.record,
                    freshness,
                }
            })
            .collect()
    }
}
