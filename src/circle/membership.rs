//! Invitation responses and circle departure.
//!
//! Accepting, declining, and leaving delegate the state transition to the
//! engine; this layer enforces that an invitation is only responded to
//! once and publishes the cache invalidations list views depend on.

use std::sync::Arc;

use super::types::{Circle, MembershipStatus};
use crate::engine::GroupEngine;
use crate::error::{CoreError, Result};
use crate::notify::{CacheInvalidation, ChangeNotifier};

/// Accept, decline, and leave operations on circles.
pub struct MembershipManager {
    engine: Arc<dyn GroupEngine>,
    notifier: ChangeNotifier,
}

impl MembershipManager {
    /// Creates a manager over the given engine.
    #[must_use]
    pub fn new(engine: Arc<dyn GroupEngine>, notifier: ChangeNotifier) -> Self {
        Self { engine, notifier }
    }

    /// Accepts a pending invitation.
    ///
    /// # Errors
    ///
    /// Returns a protocol failure if the invitation was already responded
    /// to, or if the engine rejects the transition.
    pub async fn accept_invitation(&self, circle: &Circle) -> Result<()> {
        Self::require_pending(circle)?;
        self.engine.accept(&circle.group_id).await?;

        self.notifier.notify(CacheInvalidation::PendingInvitations);
        self.notifier.notify(CacheInvalidation::CircleList);
        Ok(())
    }

    /// Declines a pending invitation.
    ///
    /// # Errors
    ///
    /// Returns a protocol failure if the invitation was already responded
    /// to, or if the engine rejects the transition.
    pub async fn decline_invitation(&self, circle: &Circle) -> Result<()> {
        Self::require_pending(circle)?;
        self.engine.decline(&circle.group_id).await?;

        self.notifier.notify(CacheInvalidation::PendingInvitations);
        self.notifier.notify(CacheInvalidation::CircleList);
        Ok(())
    }

    /// Leaves a circle the local user is a member of.
    ///
    /// # Errors
    ///
    /// Returns a protocol failure if the engine rejects the transition.
    pub async fn leave_circle(&self, circle: &Circle) -> Result<()> {
        self.engine.leave(&circle.group_id).await?;

        self.notifier.notify(CacheInvalidation::CircleList);
        Ok(())
    }

    fn require_pending(circle: &Circle) -> Result<()> {
        if circle.membership == MembershipStatus::Pending {
            Ok(())
        } else {
            Err(CoreError::Protocol(format!(
                "invitation already responded: {}",
                circle.membership.as_str()
            )))
        }
    }
}
