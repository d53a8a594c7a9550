//! In-process seen-event store.
//!
//! The skew tolerance applied to fetch watermarks means the same event may
//! be observed across successive fetches. [`SeenEvents`] deduplicates by
//! stable event identifier before paying for decryption. The store is
//! explicit and injectable rather than ambient global state: it is scoped
//! to one pipeline instance and cleared only by process restart.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::relay::EventId;

/// Append-only set of event identifiers seen this process lifetime.
#[derive(Debug, Default)]
pub struct SeenEvents {
    inner: Mutex<HashSet<EventId>>,
}

impl SeenEvents {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the identifier has been seen.
    #[must_use]
    pub fn contains(&self, id: &EventId) -> bool {
        self.lock().contains(id)
    }

    /// Marks an identifier as seen. Returns true if it was newly added.
    pub fn mark(&self, id: EventId) -> bool {
        self.lock().insert(id)
    }

    /// Number of identifiers seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether no identifiers have been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<EventId>> {
        // The set holds no invariants a panic could break.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
