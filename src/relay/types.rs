//! Types for relay events and publish outcomes.

use chrono::{DateTime, Utc};

/// Stable identifier of a relay event.
///
/// Extracted cheaply from the sealed event envelope, without decryption.
/// Used for deduplication across overlapping fetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventId(String);

impl EventId {
    /// Creates an event ID from its canonical string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque sealed event as carried by relays.
///
/// The payload bytes are owned by the engine and transport; this core only
/// reads the identifier and the relay-assigned timestamp.
#[derive(Debug, Clone)]
pub struct RelayEvent {
    /// Stable event identifier.
    pub id: EventId,
    /// When the event was created, per the envelope.
    pub created_at: DateTime<Utc>,
    /// Sealed payload bytes, opaque to this core.
    pub payload: Vec<u8>,
}

/// Result of publishing one event to a set of relays.
///
/// The three partitions are disjoint and together cover exactly the relay
/// set the publish targeted.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// The event ID that was published.
    pub event_id: EventId,
    /// Relays that accepted the event.
    pub accepted: Vec<String>,
    /// Relays that rejected the event, with reasons.
    pub rejected: Vec<(String, String)>,
    /// Relays that never responded.
    pub unresponsive: Vec<String>,
}

impl PublishOutcome {
    /// Returns true if at least one relay accepted the event.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !self.accepted.is_empty()
    }

    /// Returns the number of relays that accepted the event.
    #[must_use]
    pub const fn success_count(&self) -> usize {
        self.accepted.len()
    }

    /// Returns the total number of relays the publish targeted.
    #[must_use]
    pub const fn total_attempted(&self) -> usize {
        self.accepted.len() + self.rejected.len() + self.unresponsive.len()
    }

    /// Checks the partition invariant against the targeted relay set:
    /// disjoint partitions that together cover exactly `targets`.
    #[must_use]
    pub fn covers(&self, targets: &[String]) -> bool {
        use std::collections::HashSet;

        let mut seen: HashSet<&str> = HashSet::new();
        let all = self
            .accepted
            .iter()
            .chain(self.rejected.iter().map(|(url, _)| url))
            .chain(self.unresponsive.iter());

        for url in all {
            if !seen.insert(url.as_str()) {
                return false;
            }
        }

        let target_set: HashSet<&str> = targets.iter().map(String::as_str).collect();
        seen == target_set
    }
}
