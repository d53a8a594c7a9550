//! Core types for circle membership and invitations.
//!
//! A circle is a small trusted group sharing locations over end-to-end
//! encrypted group messaging. Circle metadata lives on the device; relays
//! only ever see member identifiers and sealed events.

use chrono::{DateTime, Utc};

use crate::relay::RelayEvent;

/// Default relay URLs for newly created circles when the caller supplies
/// none.
pub const DEFAULT_RELAYS: &[&str] = &[
    "wss://relay.damus.io",
    "wss://relay.nostr.wine",
    "wss://nos.lol",
];

/// A member's public identifier (hex-encoded public key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberId(String);

impl MemberId {
    /// Creates a member ID from its hex string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the hex string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque internal group handle.
///
/// Links circle metadata to the engine's group state. Never leaves the
/// device; events on the wire carry the public group handle instead.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GroupId(Vec<u8>);

impl GroupId {
    /// Creates a group handle from raw bytes.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Returns the raw handle bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Internal handles are never logged.
        f.write_str("GroupId(<redacted>)")
    }
}

/// Kind of circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CircleKind {
    /// Multi-member location sharing circle (e.g. family).
    #[default]
    LocationSharing,
    /// Direct 1:1 location sharing.
    DirectShare,
}

impl CircleKind {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LocationSharing => "location_sharing",
            Self::DirectShare => "direct_share",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "location_sharing" => Some(Self::LocationSharing),
            "direct_share" => Some(Self::DirectShare),
            _ => None,
        }
    }
}

/// Membership status, for the local user in a circle or for a single
/// member within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipStatus {
    /// Invitation received, not yet responded.
    Pending,
    /// Accepted and joined.
    Accepted,
    /// Invitation declined.
    Declined,
}

impl MembershipStatus {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            _ => None,
        }
    }

    /// Returns whether the circle should be visible in list views.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }
}

/// A circle member with locally resolved contact info.
///
/// Display name and avatar come from the local directory only and are
/// never transmitted.
#[derive(Debug, Clone)]
pub struct CircleMember {
    /// Member public identifier.
    pub member: MemberId,
    /// Display name from the local directory, if set.
    pub display_name: Option<String>,
    /// Avatar path from the local directory, if set.
    pub avatar_path: Option<String>,
    /// Whether this member is a group admin.
    pub is_admin: bool,
    /// This member's status within the circle.
    pub status: MembershipStatus,
}

/// A circle: a group of people who share locations.
///
/// Circle identity is the internal group handle alone; all other fields
/// are metadata that may be stale or in flight. Equality compares only
/// the handle.
#[derive(Clone)]
pub struct Circle {
    /// Opaque internal group handle (never leaves the device).
    pub group_id: GroupId,
    /// Public group handle, shared in events for relay routing.
    pub public_id: [u8; 32],
    /// User-facing display name (local only).
    pub display_name: String,
    /// Kind of circle.
    pub kind: CircleKind,
    /// Relay URLs for publishing and receiving group events.
    pub relays: Vec<String>,
    /// The local user's membership status in this circle.
    pub membership: MembershipStatus,
    /// Ordered member list.
    pub members: Vec<CircleMember>,
    /// When the circle was created.
    pub created_at: DateTime<Utc>,
    /// When the circle was last updated.
    pub updated_at: DateTime<Utc>,
}

impl PartialEq for Circle {
    fn eq(&self, other: &Self) -> bool {
        self.group_id == other.group_id
    }
}

impl Eq for Circle {}

impl std::hash::Hash for Circle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.group_id.hash(state);
    }
}

impl std::fmt::Debug for Circle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Circle")
            .field("group_id", &"<redacted>")
            .field("public_id", &hex::encode(self.public_id))
            .field("display_name", &self.display_name)
            .field("kind", &self.kind)
            .field("relays", &self.relays)
            .field("membership", &self.membership)
            .field("members", &self.members.len())
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// A member's published key bundle plus the relay set it was retrieved
/// from.
///
/// Required input to add that member to a group. Single-use: if invitation
/// creation needs to retry, the bundle must be re-fetched. The material
/// itself is opaque to this core.
#[derive(Debug, Clone)]
pub struct KeyPackageBundle {
    /// The member this bundle belongs to.
    pub member: MemberId,
    /// Opaque published key material.
    pub material: Vec<u8>,
    /// Relay URLs where the bundle was retrieved; invitations for this
    /// member are delivered there.
    pub inbox_relays: Vec<String>,
    /// When the published material expires, if bounded.
    pub expires_at: Option<DateTime<Utc>>,
}

impl KeyPackageBundle {
    /// Returns whether the published material has expired.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| now > expiry)
    }
}

/// An already-sealed invitation addressed to one recipient, paired with
/// that recipient's delivery relay set. Immutable once produced.
#[derive(Debug, Clone)]
pub struct GiftWrappedInvitation {
    /// The recipient's public identifier.
    pub recipient: MemberId,
    /// Relay URLs to publish this invitation to.
    pub recipient_relays: Vec<String>,
    /// The sealed invitation event, ready to publish.
    pub event: RelayEvent,
}
