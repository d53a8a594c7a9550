//! Shared test helpers: scriptable mock collaborators.
//!
//! The mocks implement the engine, transport, and directory contracts
//! with behavior configured per test: relays that reject or never
//! respond, events that fail to decrypt, invitations that are invalid.
//! All configuration and call recording goes through interior mutability
//! so the mocks can be shared as trait objects.

// Each integration test binary compiles this module separately and uses
// a different subset of it.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use waypoint_core::circle::types::{
    Circle, CircleKind, CircleMember, GiftWrappedInvitation, GroupId, KeyPackageBundle, MemberId,
    MembershipStatus,
};
use waypoint_core::directory::{DirectoryEntry, LocalDirectory};
use waypoint_core::engine::{
    AdmitOutcome, AdmittedInvitation, DecryptedEvent, EngineError, EngineResult, GroupCreation,
    GroupEngine, IdentitySecret,
};
use waypoint_core::location::{IncomingLocation, LocationPrecision, LocationRecord};
use waypoint_core::relay::{
    EventId, PublishOutcome, RelayEvent, RelayTransport, TransportError, TransportResult,
};

// ==================== Data constructors ====================

/// An identity for the local test user.
pub fn test_identity(member: &str) -> IdentitySecret {
    IdentitySecret::new(MemberId::new(member), vec![0x11; 32])
}

/// A key bundle whose inbox relay is derived from the member name.
pub fn bundle_for(member: &str) -> KeyPackageBundle {
    KeyPackageBundle {
        member: MemberId::new(member),
        material: member.as_bytes().to_vec(),
        inbox_relays: vec![inbox_relay(member)],
        expires_at: Some(Utc::now() + Duration::days(7)),
    }
}

/// The inbox relay URL used by [`bundle_for`].
pub fn inbox_relay(member: &str) -> String {
    format!("wss://inbox.{member}.example.com")
}

/// A sealed relay event with the given identifier.
pub fn relay_event(id: &str) -> RelayEvent {
    RelayEvent {
        id: EventId::new(id),
        created_at: Utc::now(),
        payload: id.as_bytes().to_vec(),
    }
}

/// A circle the local user has accepted membership in.
pub fn test_circle(name: &str) -> Circle {
    let now = Utc::now();
    Circle {
        group_id: GroupId::from_slice(name.as_bytes()),
        public_id: [0x77; 32],
        display_name: name.to_string(),
        kind: CircleKind::LocationSharing,
        relays: vec!["wss://relay.example.com".to_string()],
        membership: MembershipStatus::Accepted,
        members: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

/// A location record captured `age` ago, expiring 24 hours after capture.
pub fn record_aged(age: Duration) -> LocationRecord {
    let captured = Utc::now() - age;
    LocationRecord {
        latitude: 37.7749,
        longitude: -122.4194,
        geohash: "9q8yyk8y".to_string(),
        timestamp: captured,
        expires_at: captured + Duration::hours(24),
        precision: LocationPrecision::Standard,
    }
}

/// An inbound location from `sender`, captured `age` ago.
pub fn incoming_from(sender: &str, age: Duration) -> IncomingLocation {
    IncomingLocation {
        sender: MemberId::new(sender),
        record: record_aged(age),
    }
}

// ==================== Mock transport ====================

/// Scriptable [`RelayTransport`].
#[derive(Default)]
pub struct MockTransport {
    /// Relays that reject every publish.
    pub rejecting_relays: Mutex<HashSet<String>>,
    /// Relays that never respond to a publish.
    pub unresponsive_relays: Mutex<HashSet<String>>,
    /// When set, every publish fails outright with this reason.
    pub publish_error: Mutex<Option<String>>,
    /// Events returned by `fetch_addressed_to`.
    pub addressed_events: Mutex<Vec<RelayEvent>>,
    /// Events returned by `fetch_group_events`.
    pub group_events: Mutex<Vec<RelayEvent>>,
    /// When true, fetches fail.
    pub fetch_error: Mutex<bool>,
    /// Key bundles by member.
    pub bundles: Mutex<HashMap<MemberId, KeyPackageBundle>>,
    /// When true, bundle lookups fail.
    pub bundle_error: Mutex<bool>,
    /// When set, bundle lookups block until a permit is released.
    pub bundle_gate: Mutex<Option<std::sync::Arc<tokio::sync::Semaphore>>>,
    /// Recorded publishes: event ID and target relay set.
    pub published: Mutex<Vec<(EventId, Vec<String>)>>,
    /// Recorded `since` watermarks passed to group fetches.
    pub group_fetch_since: Mutex<Vec<Option<DateTime<Utc>>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_relay(&self, url: &str) {
        self.rejecting_relays.lock().unwrap().insert(url.to_string());
    }

    pub fn set_group_events(&self, events: Vec<RelayEvent>) {
        *self.group_events.lock().unwrap() = events;
    }

    pub fn set_addressed_events(&self, events: Vec<RelayEvent>) {
        *self.addressed_events.lock().unwrap() = events;
    }

    pub fn add_bundle(&self, bundle: KeyPackageBundle) {
        self.bundles
            .lock()
            .unwrap()
            .insert(bundle.member.clone(), bundle);
    }

    pub fn publish_count(&self) -> usize {
        self.published.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl RelayTransport for MockTransport {
    async fn publish(
        &self,
        event: &RelayEvent,
        relays: &[String],
    ) -> TransportResult<PublishOutcome> {
        if let Some(reason) = self.publish_error.lock().unwrap().clone() {
            return Err(TransportError::new(reason));
        }

        self.published
            .lock()
            .unwrap()
            .push((event.id.clone(), relays.to_vec()));

        let rejecting = self.rejecting_relays.lock().unwrap();
        let unresponsive = self.unresponsive_relays.lock().unwrap();

        let mut outcome = PublishOutcome {
            event_id: event.id.clone(),
            accepted: Vec::new(),
            rejected: Vec::new(),
            unresponsive: Vec::new(),
        };

        for relay in relays {
            if rejecting.contains(relay) {
                outcome
                    .rejected
                    .push((relay.clone(), "scripted rejection".to_string()));
            } else if unresponsive.contains(relay) {
                outcome.unresponsive.push(relay.clone());
            } else {
                outcome.accepted.push(relay.clone());
            }
        }

        Ok(outcome)
    }

    async fn fetch_addressed_to(
        &self,
        _recipient: &MemberId,
        _relays: &[String],
        _since: Option<DateTime<Utc>>,
    ) -> TransportResult<Vec<RelayEvent>> {
        if *self.fetch_error.lock().unwrap() {
            return Err(TransportError::new("scripted fetch failure"));
        }
        Ok(self.addressed_events.lock().unwrap().clone())
    }

    async fn fetch_group_events(
        &self,
        _public_group_id: &[u8; 32],
        _relays: &[String],
        since: Option<DateTime<Utc>>,
    ) -> TransportResult<Vec<RelayEvent>> {
        self.group_fetch_since.lock().unwrap().push(since);
        if *self.fetch_error.lock().unwrap() {
            return Err(TransportError::new("scripted fetch failure"));
        }
        Ok(self.group_events.lock().unwrap().clone())
    }

    async fn fetch_key_bundle(
        &self,
        member: &MemberId,
    ) -> TransportResult<Option<KeyPackageBundle>> {
        let gate = self.bundle_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await;
        }
        if *self.bundle_error.lock().unwrap() {
            return Err(TransportError::new("scripted lookup failure"));
        }
        Ok(self.bundles.lock().unwrap().get(member).cloned())
    }
}

// ==================== Mock engine ====================

/// Scripted behavior for admitting one invitation event.
#[derive(Clone)]
pub enum ScriptedAdmit {
    /// Admit into a circle with this name.
    Admit(String),
    /// Report the event as invalid.
    Invalid(String),
    /// Fail the admission outright.
    Fail(String),
}

/// Scriptable [`GroupEngine`].
#[derive(Default)]
pub struct MockEngine {
    /// When true, group creation fails.
    pub fail_create: Mutex<bool>,
    /// When true, finalize fails.
    pub fail_finalize: Mutex<bool>,
    /// When true, sealing a location fails.
    pub fail_encrypt: Mutex<bool>,
    /// Number of finalize calls observed.
    pub finalize_calls: Mutex<usize>,
    /// Groups left via `leave`.
    pub left_groups: Mutex<Vec<GroupId>>,
    /// Groups accepted via `accept`.
    pub accepted_groups: Mutex<Vec<GroupId>>,
    /// Groups declined via `decline`.
    pub declined_groups: Mutex<Vec<GroupId>>,
    /// Decrypt script: event ID to outcome (Err reason on failure).
    pub decrypt_script: Mutex<HashMap<EventId, Result<DecryptedEvent, String>>>,
    /// Events decrypted, in order.
    pub decrypt_calls: Mutex<Vec<EventId>>,
    /// Admission script: event ID to behavior.
    pub admit_script: Mutex<HashMap<EventId, ScriptedAdmit>>,
    /// Invitation events already admitted (drives AlreadyProcessed).
    pub admitted_events: Mutex<HashSet<EventId>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_decrypt(&self, id: &str, outcome: Result<DecryptedEvent, &str>) {
        self.decrypt_script
            .lock()
            .unwrap()
            .insert(EventId::new(id), outcome.map_err(str::to_string));
    }

    pub fn script_admit(&self, id: &str, behavior: ScriptedAdmit) {
        self.admit_script
            .lock()
            .unwrap()
            .insert(EventId::new(id), behavior);
    }

    pub fn finalize_count(&self) -> usize {
        *self.finalize_calls.lock().unwrap()
    }

    pub fn decrypt_count(&self) -> usize {
        self.decrypt_calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl GroupEngine for MockEngine {
    async fn create_group(
        &self,
        identity: &IdentitySecret,
        invitees: &[KeyPackageBundle],
        name: &str,
        kind: CircleKind,
    ) -> EngineResult<GroupCreation> {
        if *self.fail_create.lock().unwrap() {
            return Err(EngineError::new("scripted creation failure"));
        }

        let now = Utc::now();
        let mut members = vec![CircleMember {
            member: identity.member().clone(),
            display_name: None,
            avatar_path: None,
            is_admin: true,
            status: MembershipStatus::Accepted,
        }];
        members.extend(invitees.iter().map(|bundle| CircleMember {
            member: bundle.member.clone(),
            display_name: None,
            avatar_path: None,
            is_admin: false,
            status: MembershipStatus::Pending,
        }));

        let circle = Circle {
            group_id: GroupId::from_slice(name.as_bytes()),
            public_id: [0x77; 32],
            display_name: name.to_string(),
            kind,
            relays: vec!["wss://relay.example.com".to_string()],
            membership: MembershipStatus::Accepted,
            members,
            created_at: now,
            updated_at: now,
        };

        let invitations = invitees
            .iter()
            .map(|bundle| GiftWrappedInvitation {
                recipient: bundle.member.clone(),
                recipient_relays: bundle.inbox_relays.clone(),
                event: relay_event(&format!("invite-{}", bundle.member)),
            })
            .collect();

        Ok(GroupCreation {
            circle,
            invitations,
        })
    }

    async fn finalize(&self, _group: &GroupId) -> EngineResult<()> {
        *self.finalize_calls.lock().unwrap() += 1;
        if *self.fail_finalize.lock().unwrap() {
            return Err(EngineError::new("scripted finalize failure"));
        }
        Ok(())
    }

    async fn encrypt_location(
        &self,
        _group: &GroupId,
        sender: &MemberId,
        _record: &LocationRecord,
    ) -> EngineResult<RelayEvent> {
        if *self.fail_encrypt.lock().unwrap() {
            return Err(EngineError::new("scripted sealing failure"));
        }
        Ok(relay_event(&format!("loc-{sender}")))
    }

    async fn decrypt_event(
        &self,
        _group: &GroupId,
        event: &RelayEvent,
    ) -> EngineResult<DecryptedEvent> {
        self.decrypt_calls.lock().unwrap().push(event.id.clone());
        match self.decrypt_script.lock().unwrap().get(&event.id) {
            Some(Ok(decrypted)) => Ok(decrypted.clone()),
            Some(Err(reason)) => Err(EngineError::new(reason.clone())),
            None => Ok(DecryptedEvent::NonLocation),
        }
    }

    async fn admit_invitation(
        &self,
        _identity: &IdentitySecret,
        wrapped: &RelayEvent,
    ) -> EngineResult<AdmitOutcome> {
        let behavior = self.admit_script.lock().unwrap().get(&wrapped.id).cloned();
        match behavior {
            Some(ScriptedAdmit::Admit(circle_name)) => {
                let newly = self.admitted_events.lock().unwrap().insert(wrapped.id.clone());
                if newly {
                    Ok(AdmitOutcome::Admitted(AdmittedInvitation {
                        group_id: GroupId::from_slice(circle_name.as_bytes()),
                        circle_name,
                        inviter: MemberId::new("inviter"),
                        member_count: 2,
                        invited_at: Utc::now(),
                    }))
                } else {
                    Ok(AdmitOutcome::AlreadyProcessed)
                }
            }
            Some(ScriptedAdmit::Invalid(reason)) => Ok(AdmitOutcome::Invalid(reason)),
            Some(ScriptedAdmit::Fail(reason)) => Err(EngineError::new(reason)),
            None => Ok(AdmitOutcome::Invalid("unscripted event".to_string())),
        }
    }

    async fn accept(&self, group: &GroupId) -> EngineResult<()> {
        self.accepted_groups.lock().unwrap().push(group.clone());
        Ok(())
    }

    async fn decline(&self, group: &GroupId) -> EngineResult<()> {
        self.declined_groups.lock().unwrap().push(group.clone());
        Ok(())
    }

    async fn leave(&self, group: &GroupId) -> EngineResult<()> {
        self.left_groups.lock().unwrap().push(group.clone());
        Ok(())
    }
}

// ==================== Mock directory ====================

/// Map-backed [`LocalDirectory`].
#[derive(Default)]
pub struct MockDirectory {
    entries: Mutex<HashMap<MemberId, DirectoryEntry>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&self, member: &str, name: &str) {
        self.entries.lock().unwrap().insert(
            MemberId::new(member),
            DirectoryEntry {
                display_name: Some(name.to_string()),
                avatar_path: None,
            },
        );
    }
}

impl LocalDirectory for MockDirectory {
    fn lookup(&self, member: &MemberId) -> Option<DirectoryEntry> {
        self.entries.lock().unwrap().get(member).cloned()
    }
}
