//! Cache invalidation notifications.
//!
//! The orchestrators in this crate mutate circle and invitation state, but
//! the cached list views live on the presentation side. Rather than calling
//! back into caching internals, mutations publish an explicit
//! [`CacheInvalidation`] on a broadcast channel; whatever caching layer the
//! presentation side owns subscribes and refreshes the named view.

use tokio::sync::broadcast;

/// Capacity of the invalidation channel. Invalidations are tiny and
/// idempotent; a lagged subscriber simply refreshes everything.
const CHANNEL_CAPACITY: usize = 16;

/// A cached view that must be refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheInvalidation {
    /// The circle list changed (circle created, accepted, declined, left).
    CircleList,
    /// The pending-invitations list changed (new invitation admitted).
    PendingInvitations,
}

/// Broadcast channel for cache invalidations.
///
/// Cloneable; all clones share the same channel. Sending never fails:
/// an invalidation with no subscribers is simply dropped.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<CacheInvalidation>,
}

impl ChangeNotifier {
    /// Creates a new notifier with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publishes an invalidation to all current subscribers.
    pub fn notify(&self, invalidation: CacheInvalidation) {
        // An Err here only means nobody is subscribed.
        let _ = self.sender.send(invalidation);
    }

    /// Subscribes to future invalidations.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheInvalidation> {
        self.sender.subscribe()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}
