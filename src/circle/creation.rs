//! Circle creation orchestration.
//!
//! Creating a circle spans several independent network calls: build the
//! group via the engine, fan out one sealed invitation per invitee, then
//! commit the pending group. The orchestrator makes that flow
//! all-or-nothing from the caller's point of view: the group is finalized
//! only once *every* invitation was accepted by at least one of its target
//! relays. Anything less leaves the group uncommitted, so no invitee can
//! hold a membership proof the owner's state does not reflect.
//!
//! Once a pending group exists the flow always runs to either finalize or
//! an error carrying the pending handle; the caller then retries finalize
//! or explicitly abandons the handle. Pending groups are never silently
//! dropped.

use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;
use tokio::sync::watch;

use super::types::{Circle, CircleKind, GiftWrappedInvitation, GroupId, KeyPackageBundle, MemberId};
use crate::engine::{GroupEngine, IdentitySecret};
use crate::error::CoreError;
use crate::notify::{CacheInvalidation, ChangeNotifier};
use crate::relay::RelayTransport;

/// Progress of a circle creation flow.
///
/// Fractions are strictly increasing with step order, for driving a
/// progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreationProgress {
    /// No creation in flight (also the state after an error).
    #[default]
    Idle,
    /// Asking the engine to build the group and invitations.
    CreatingGroup,
    /// Publishing invitations to recipient relay sets.
    SendingInvites,
    /// The circle is committed and visible.
    Complete,
}

impl CreationProgress {
    /// Fractional progress for this state.
    #[must_use]
    pub const fn fraction(self) -> f64 {
        match self {
            Self::Idle => 0.0,
            Self::CreatingGroup => 0.25,
            Self::SendingInvites => 0.65,
            Self::Complete => 1.0,
        }
    }
}

/// One invitation that failed to reach any of its target relays.
#[derive(Debug, Clone)]
pub struct InviteFailure {
    /// The invitee whose invitation was undelivered.
    pub recipient: MemberId,
    /// Why delivery failed.
    pub reason: String,
}

/// Error type for circle creation.
///
/// Variants carrying a pending [`GroupId`] mean the engine holds an
/// uncommitted group for this flow; the caller resolves it with
/// [`CircleCreationOrchestrator::retry_finalize`] or
/// [`CircleCreationOrchestrator::abandon`].
#[derive(Debug, Error)]
pub enum CreateCircleError {
    /// The engine failed to build the group. Nothing was created.
    #[error("group creation failed: {0}")]
    GroupCreation(#[from] CoreError),

    /// One or more invitations reached none of their target relays. The
    /// group was left uncommitted.
    #[error("{} of {total} invitations undelivered; group left uncommitted", failures.len())]
    InvitationDelivery {
        /// Handle of the uncommitted group.
        pending: GroupId,
        /// The invitations that failed, with reasons.
        failures: Vec<InviteFailure>,
        /// Total number of invitations attempted.
        total: usize,
    },

    /// All invitations were delivered but the commit failed. Retryable
    /// without re-creating the group.
    #[error("finalize failed for pending group: {reason}")]
    Finalize {
        /// Handle of the uncommitted group.
        pending: GroupId,
        /// Why the commit failed.
        reason: String,
    },
}

/// Drives group creation end to end.
pub struct CircleCreationOrchestrator {
    engine: Arc<dyn GroupEngine>,
    transport: Arc<dyn RelayTransport>,
    notifier: ChangeNotifier,
    progress: watch::Sender<CreationProgress>,
}

impl CircleCreationOrchestrator {
    /// Creates an orchestrator over the given collaborators.
    #[must_use]
    pub fn new(
        engine: Arc<dyn GroupEngine>,
        transport: Arc<dyn RelayTransport>,
        notifier: ChangeNotifier,
    ) -> Self {
        let (progress, _) = watch::channel(CreationProgress::Idle);
        Self {
            engine,
            transport,
            notifier,
            progress,
        }
    }

    /// Subscribes to progress updates for this orchestrator's flows.
    #[must_use]
    pub fn progress(&self) -> watch::Receiver<CreationProgress> {
        self.progress.subscribe()
    }

    /// Creates a circle: builds the group, fans out invitations, and
    /// commits only if every invitation was delivered.
    ///
    /// Per-invitation publishes run concurrently; the commit decision is
    /// made only after all of them have settled. On success the circle
    /// list is invalidated and the committed circle returned.
    ///
    /// # Errors
    ///
    /// See [`CreateCircleError`]. Errors after the group was built carry
    /// the pending handle; the flow is never partially applied.
    pub async fn create_circle(
        &self,
        identity: &IdentitySecret,
        invitees: &[KeyPackageBundle],
        name: &str,
        kind: CircleKind,
    ) -> Result<Circle, CreateCircleError> {
        self.set_progress(CreationProgress::CreatingGroup);

        let creation = match self.engine.create_group(identity, invitees, name, kind).await {
            Ok(creation) => creation,
            Err(e) => {
                self.set_progress(CreationProgress::Idle);
                return Err(CreateCircleError::GroupCreation(e.into()));
            }
        };

        self.set_progress(CreationProgress::SendingInvites);

        let total = creation.invitations.len();
        let failures = self.deliver_invitations(&creation.invitations).await;

        if !failures.is_empty() {
            self.set_progress(CreationProgress::Idle);
            return Err(CreateCircleError::InvitationDelivery {
                pending: creation.circle.group_id,
                failures,
                total,
            });
        }

        if let Err(e) = self.engine.finalize(&creation.circle.group_id).await {
            self.set_progress(CreationProgress::Idle);
            return Err(CreateCircleError::Finalize {
                pending: creation.circle.group_id,
                reason: e.to_string(),
            });
        }

        self.notifier.notify(CacheInvalidation::CircleList);
        self.set_progress(CreationProgress::Complete);

        Ok(creation.circle)
    }

    /// Retries the commit of a pending group after a finalize failure.
    ///
    /// # Errors
    ///
    /// Returns [`CreateCircleError::Finalize`] if the commit fails again.
    pub async fn retry_finalize(&self, pending: &GroupId) -> Result<(), CreateCircleError> {
        self.engine
            .finalize(pending)
            .await
            .map_err(|e| CreateCircleError::Finalize {
                pending: pending.clone(),
                reason: e.to_string(),
            })?;

        self.notifier.notify(CacheInvalidation::CircleList);
        self.set_progress(CreationProgress::Complete);
        Ok(())
    }

    /// Explicitly abandons an uncommitted group after a failed creation.
    ///
    /// # Errors
    ///
    /// Returns a protocol failure if the engine cannot dispose of the
    /// pending state.
    pub async fn abandon(&self, pending: &GroupId) -> crate::error::Result<()> {
        self.engine.leave(pending).await?;
        Ok(())
    }

    /// Publishes each invitation to its recipient relay set, concurrently,
    /// and waits for all to settle. An invitation counts as delivered if
    /// at least one of its target relays accepted it.
    async fn deliver_invitations(
        &self,
        invitations: &[GiftWrappedInvitation],
    ) -> Vec<InviteFailure> {
        let publishes = invitations.iter().map(|invitation| async {
            let result = self
                .transport
                .publish(&invitation.event, &invitation.recipient_relays)
                .await;

            match result {
                Ok(outcome) if outcome.is_success() => None,
                Ok(_) => Some(InviteFailure {
                    recipient: invitation.recipient.clone(),
                    reason: "no target relay accepted the invitation".to_string(),
                }),
                Err(e) => Some(InviteFailure {
                    recipient: invitation.recipient.clone(),
                    reason: e.to_string(),
                }),
            }
        });

        let failures: Vec<InviteFailure> = join_all(publishes).await.into_iter().flatten().collect();

        for failure in &failures {
            tracing::warn!(
                "invitation for {} undelivered: {}",
                failure.recipient,
                failure.reason
            );
        }

        failures
    }

    fn set_progress(&self, state: CreationProgress) {
        // Err means no subscribers, which is fine.
        let _ = self.progress.send(state);
    }
}
