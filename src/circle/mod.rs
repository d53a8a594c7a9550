//! Circle management for location sharing.
//!
//! A circle is a small trusted group sharing locations over end-to-end
//! encrypted group messaging. This module holds the orchestration around
//! the group engine:
//!
//! - [`MemberValidator`] / [`ValidationSession`]: key-bundle validation
//!   for candidate members
//! - [`CircleCreationOrchestrator`]: all-or-nothing circle creation
//! - [`InvitationPoller`]: discovery and admission of wrapped invitations
//! - [`MembershipManager`]: accept, decline, and leave
//!
//! # Privacy model
//!
//! Display names and avatars are stored only on the device; relays see
//! member identifiers and sealed events, never usernames. Internal group
//! handles never leave the device and are redacted from all Debug output.

mod creation;
mod membership;
mod poller;
pub mod types;
mod validator;

pub use creation::{
    CircleCreationOrchestrator, CreateCircleError, CreationProgress, InviteFailure,
};
pub use membership::MembershipManager;
pub use poller::InvitationPoller;
pub use types::{
    Circle, CircleKind, CircleMember, GiftWrappedInvitation, GroupId, KeyPackageBundle, MemberId,
    MembershipStatus, DEFAULT_RELAYS,
};
pub use validator::{MemberValidator, ValidationOutcome, ValidationSession};
