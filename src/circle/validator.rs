//! Member validation.
//!
//! Before a candidate can be added to a circle, their published key bundle
//! must be fetched and validated. "This member has no published bundle" is
//! terminal and must never be conflated with "the lookup itself failed",
//! which is transient and retryable.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use super::types::{KeyPackageBundle, MemberId};
use crate::relay::RelayTransport;

/// Outcome of validating one candidate member.
#[derive(Debug, Clone)]
pub enum ValidationOutcome {
    /// The candidate has a usable published key bundle.
    Valid(KeyPackageBundle),
    /// The candidate cannot be invited. Terminal; do not retry.
    Invalid(String),
    /// The lookup itself failed. Transient; the caller may offer retry.
    NetworkFailure(String),
}

/// Fetches and validates candidate members' key bundles.
pub struct MemberValidator {
    transport: Arc<dyn RelayTransport>,
}

impl MemberValidator {
    /// Creates a validator over the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn RelayTransport>) -> Self {
        Self { transport }
    }

    /// Validates one candidate.
    ///
    /// Distinct candidates may be validated concurrently; calls are
    /// independent.
    pub async fn validate(&self, candidate: &MemberId) -> ValidationOutcome {
        match self.transport.fetch_key_bundle(candidate).await {
            Ok(Some(bundle)) => {
                if bundle.is_expired(Utc::now()) {
                    ValidationOutcome::Invalid(format!("key bundle for {candidate} has expired"))
                } else {
                    ValidationOutcome::Valid(bundle)
                }
            }
            Ok(None) => {
                ValidationOutcome::Invalid(format!("no published key bundle for {candidate}"))
            }
            Err(e) => ValidationOutcome::NetworkFailure(e.to_string()),
        }
    }
}

/// A working set of candidates being validated.
///
/// Tracks which candidates are still wanted; a candidate dismissed while
/// its validation is in flight has the result discarded silently, so no
/// state or UI mutation happens for a candidate the user removed.
pub struct ValidationSession {
    validator: MemberValidator,
    active: Mutex<HashSet<MemberId>>,
}

impl ValidationSession {
    /// Creates a session over the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn RelayTransport>) -> Self {
        Self {
            validator: MemberValidator::new(transport),
            active: Mutex::new(HashSet::new()),
        }
    }

    /// Removes a candidate from the working set. Any in-flight validation
    /// for it will resolve to `None`.
    pub fn dismiss(&self, candidate: &MemberId) {
        self.lock().remove(candidate);
    }

    /// Validates a candidate as part of the working set.
    ///
    /// Returns `None` if the candidate was dismissed while the lookup was
    /// in flight.
    pub async fn validate(&self, candidate: MemberId) -> Option<ValidationOutcome> {
        self.lock().insert(candidate.clone());

        let outcome = self.validator.validate(&candidate).await;

        if self.lock().contains(&candidate) {
            Some(outcome)
        } else {
            tracing::debug!("discarding validation result for dismissed candidate {candidate}");
            None
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<MemberId>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
