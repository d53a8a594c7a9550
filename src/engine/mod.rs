//! Group engine contract.
//!
//! The cryptographic group-messaging engine (membership state machine, key
//! schedule, commit and welcome processing, message sealing) is an external
//! collaborator. This module defines the contract this core drives it
//! through, plus the outcome types the engine reports.
//!
//! Engine outcomes that are expected protocol results - an invitation that
//! was already processed, a group event that is not a location - are
//! modeled as `Ok` variants, not errors. An `Err` from the engine means
//! the requested transition could not be carried out at all.

use chrono::{DateTime, Utc};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::circle::types::{Circle, CircleKind, GiftWrappedInvitation, GroupId, KeyPackageBundle, MemberId};
use crate::location::types::{IncomingLocation, LocationRecord};
use crate::relay::RelayEvent;

/// Opaque failure reported by the group engine.
///
/// Whatever the engine's native failure convention, it is flattened to a
/// reason string at this boundary; this core classifies every engine
/// failure as a protocol failure (see [`crate::error::CoreError`]).
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct EngineError(String);

impl EngineError {
    /// Creates an engine error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// The caller's identity secret material.
///
/// Opaque to this core; handed to the engine for group creation and
/// invitation admission. Zeroed on drop, never logged.
#[derive(Clone)]
pub struct IdentitySecret {
    member: MemberId,
    secret: Zeroizing<Vec<u8>>,
}

impl IdentitySecret {
    /// Wraps identity secret material for the given member.
    #[must_use]
    pub fn new(member: MemberId, secret: Vec<u8>) -> Self {
        Self {
            member,
            secret: Zeroizing::new(secret),
        }
    }

    /// The public identifier this secret belongs to.
    #[must_use]
    pub const fn member(&self) -> &MemberId {
        &self.member
    }

    /// The raw secret bytes, for handing to an engine implementation.
    #[must_use]
    pub fn expose_secret(&self) -> &[u8] {
        &self.secret
    }
}

impl std::fmt::Debug for IdentitySecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentitySecret")
            .field("member", &self.member)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Result of asking the engine to create a group.
///
/// The group record is *pending*: it does not become the engine's durable
/// state until [`GroupEngine::finalize`] is called. The invitations are
/// sealed and ready to publish, one per invitee.
#[derive(Debug, Clone)]
pub struct GroupCreation {
    /// The pending (not yet committed) circle record.
    pub circle: Circle,
    /// One sealed invitation per invitee.
    pub invitations: Vec<GiftWrappedInvitation>,
}

/// A newly admitted invitation, as reported by the engine.
#[derive(Clone)]
pub struct AdmittedInvitation {
    /// Internal handle of the circle joined (pending acceptance).
    pub group_id: GroupId,
    /// Circle name from the invitation metadata.
    pub circle_name: String,
    /// Who sent the invitation.
    pub inviter: MemberId,
    /// Number of members in the circle.
    pub member_count: usize,
    /// When the invitation was admitted.
    pub invited_at: DateTime<Utc>,
}

impl std::fmt::Debug for AdmittedInvitation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmittedInvitation")
            .field("group_id", &"<redacted>")
            .field("circle_name", &self.circle_name)
            .field("inviter", &self.inviter)
            .field("member_count", &self.member_count)
            .field("invited_at", &self.invited_at)
            .finish()
    }
}

/// Outcome of attempting to admit one wrapped invitation.
#[derive(Debug, Clone)]
pub enum AdmitOutcome {
    /// The invitation was newly admitted.
    Admitted(AdmittedInvitation),
    /// This invitation was already processed earlier. Not an error.
    AlreadyProcessed,
    /// The event is not a valid invitation for this identity.
    Invalid(String),
}

/// Outcome of decrypting one group event.
#[derive(Debug, Clone)]
pub enum DecryptedEvent {
    /// A peer location update.
    Location(IncomingLocation),
    /// A valid group event that carries no location (e.g. a commit).
    NonLocation,
}

/// The group-messaging engine operations this core drives.
#[async_trait::async_trait]
pub trait GroupEngine: Send + Sync {
    /// Creates a group with the given invitees and produces one sealed
    /// invitation per invitee plus a pending group record.
    ///
    /// Atomic from the caller's point of view: either a pending group and
    /// N invitations, or an error with no group created.
    async fn create_group(
        &self,
        identity: &IdentitySecret,
        invitees: &[KeyPackageBundle],
        name: &str,
        kind: CircleKind,
    ) -> EngineResult<GroupCreation>;

    /// Commits a pending group, making it the engine's durable state.
    ///
    /// Safe to retry for the same handle after a failure.
    async fn finalize(&self, group: &GroupId) -> EngineResult<()>;

    /// Seals a location record for the given group.
    async fn encrypt_location(
        &self,
        group: &GroupId,
        sender: &MemberId,
        record: &LocationRecord,
    ) -> EngineResult<RelayEvent>;

    /// Unseals one group event.
    async fn decrypt_event(
        &self,
        group: &GroupId,
        event: &RelayEvent,
    ) -> EngineResult<DecryptedEvent>;

    /// Attempts to unwrap and admit one wrapped invitation.
    async fn admit_invitation(
        &self,
        identity: &IdentitySecret,
        wrapped: &RelayEvent,
    ) -> EngineResult<AdmitOutcome>;

    /// Accepts a pending invitation to the given group.
    async fn accept(&self, group: &GroupId) -> EngineResult<()>;

    /// Declines a pending invitation to the given group.
    async fn decline(&self, group: &GroupId) -> EngineResult<()>;

    /// Leaves the given group.
    async fn leave(&self, group: &GroupId) -> EngineResult<()>;
}
