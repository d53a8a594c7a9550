//! Invitation polling.
//!
//! Discovers wrapped invitations addressed to the local identity on a
//! fixed relay set and attempts to admit each one via the engine. Every
//! fetched event is attempted: an invalid or already-processed event is
//! logged and skipped, never aborting its siblings. Re-running the poller
//! over overlapping event sets is safe because "already processed" is a
//! non-fatal outcome and admitted invitations are only counted when new.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::engine::{AdmitOutcome, GroupEngine, IdentitySecret};
use crate::notify::{CacheInvalidation, ChangeNotifier};
use crate::relay::RelayTransport;

/// Polls relays for wrapped invitations and admits them.
pub struct InvitationPoller {
    engine: Arc<dyn GroupEngine>,
    transport: Arc<dyn RelayTransport>,
    notifier: ChangeNotifier,
    relays: Vec<String>,
}

impl InvitationPoller {
    /// Creates a poller over the given collaborators and relay set.
    #[must_use]
    pub fn new(
        engine: Arc<dyn GroupEngine>,
        transport: Arc<dyn RelayTransport>,
        notifier: ChangeNotifier,
        relays: Vec<String>,
    ) -> Self {
        Self {
            engine,
            transport,
            notifier,
            relays,
        }
    }

    /// Fetches wrapped invitations addressed to `identity` since the
    /// watermark and attempts to admit each independently.
    ///
    /// Returns the number of newly admitted invitations; 0 when there are
    /// none, including when the fetch itself fails. On at least one new
    /// admission, the pending-invitations and circle list views are
    /// invalidated. The count is aggregated only after every attempt has
    /// settled.
    pub async fn poll(
        &self,
        identity: &IdentitySecret,
        since: Option<DateTime<Utc>>,
    ) -> usize {
        let events = match self
            .transport
            .fetch_addressed_to(identity.member(), &self.relays, since)
            .await
        {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("invitation fetch failed: {e}");
                return 0;
            }
        };

        let attempts = events.iter().map(|event| async {
            match self.engine.admit_invitation(identity, event).await {
                Ok(AdmitOutcome::Admitted(invitation)) => {
                    tracing::debug!(
                        "admitted invitation to '{}' from {}",
                        invitation.circle_name,
                        invitation.inviter
                    );
                    true
                }
                Ok(AdmitOutcome::AlreadyProcessed) => {
                    tracing::debug!("invitation event {} already processed", event.id);
                    false
                }
                Ok(AdmitOutcome::Invalid(reason)) => {
                    tracing::warn!("invalid invitation event {}: {reason}", event.id);
                    false
                }
                Err(e) => {
                    tracing::warn!("admission failed for event {}: {e}", event.id);
                    false
                }
            }
        });

        let admitted = join_all(attempts)
            .await
            .into_iter()
            .filter(|newly_admitted| *newly_admitted)
            .count();

        if admitted > 0 {
            self.notifier.notify(CacheInvalidation::PendingInvitations);
            self.notifier.notify(CacheInvalidation::CircleList);
        }

        admitted
    }
}
