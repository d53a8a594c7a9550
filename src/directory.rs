//! Local contact directory contract.
//!
//! Display names and avatars are stored only on the user's device and
//! never transmitted; relays only ever see member identifiers. The
//! directory is owned by the presentation side and is read-only from this
//! core's perspective - it is consulted when enriching peer locations and
//! circle members for display.

use crate::circle::types::MemberId;

/// Locally assigned profile for a member identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Locally assigned display name.
    pub display_name: Option<String>,
    /// Local path to an avatar image.
    pub avatar_path: Option<String>,
}

/// Read-only identifier-to-profile lookup.
pub trait LocalDirectory: Send + Sync {
    /// Looks up the locally stored profile for a member, if any.
    fn lookup(&self, member: &MemberId) -> Option<DirectoryEntry>;
}
