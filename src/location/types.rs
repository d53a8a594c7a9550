//! Location data types.
//!
//! One record shape flows through the pipeline in three views: the
//! to-encrypt [`LocationRecord`] produced on the sending device, the
//! decrypted-inbound [`IncomingLocation`] reported by the engine, and the
//! enriched-for-display [`MemberLocation`] returned to the caller.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::circle::types::MemberId;

/// Default lifetime of a shared location.
const DEFAULT_TTL_HOURS: i64 = 24;

/// Precision tier for coordinate reduction.
///
/// Determines how many decimal places are retained before a location
/// leaves the device. Lower precision means more privacy.
///
/// | Tier     | Decimal places | Approximate radius |
/// |----------|----------------|--------------------|
/// | Private  | 2              | ~1.1 km            |
/// | Standard | 4              | ~11 m              |
/// | Enhanced | 5              | ~1.1 m             |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LocationPrecision {
    /// 2 decimal places (~1.1 km) - maximum privacy.
    Private,
    /// 4 decimal places (~11 m) - balanced.
    Standard,
    /// 5 decimal places (~1.1 m) - precise sharing within a circle.
    #[default]
    Enhanced,
}

impl LocationPrecision {
    /// Returns the number of decimal places for this tier.
    #[must_use]
    pub const fn decimal_places(self) -> i32 {
        match self {
            Self::Private => 2,
            Self::Standard => 4,
            Self::Enhanced => 5,
        }
    }
}

/// Freshness of a peer location, by age since capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Captured less than a minute ago.
    Live,
    /// Captured less than five minutes ago.
    Recent,
    /// Captured less than fifteen minutes ago.
    Stale,
    /// Older than fifteen minutes.
    Old,
}

impl Freshness {
    /// Classifies an age since capture. Pure; negative ages (clock skew)
    /// classify as live.
    #[must_use]
    pub fn classify(age: Duration) -> Self {
        if age < Duration::minutes(1) {
            Self::Live
        } else if age < Duration::minutes(5) {
            Self::Recent
        } else if age < Duration::minutes(15) {
            Self::Stale
        } else {
            Self::Old
        }
    }
}

/// A location as carried inside an encrypted group event.
///
/// Coordinates are precision-reduced on the sending device before this
/// record is ever built; nothing finer-grained exists to leak. The record
/// always satisfies `expires_at > timestamp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Reduced latitude.
    pub latitude: f64,
    /// Reduced longitude.
    pub longitude: f64,
    /// Geohash of the reduced coordinates.
    pub geohash: String,
    /// When the location was captured.
    pub timestamp: DateTime<Utc>,
    /// When this location expires and must no longer be surfaced.
    pub expires_at: DateTime<Utc>,
    /// Precision tier the coordinates were reduced to.
    pub precision: LocationPrecision,
}

impl LocationRecord {
    /// Builds a to-encrypt record from raw device coordinates.
    ///
    /// Reduces the coordinates to the given tier, encodes a geohash, and
    /// stamps capture and expiry times. Non-finite or out-of-range
    /// coordinates are clamped to 0.0 rather than rejected.
    #[must_use]
    pub fn from_raw(lat: f64, lon: f64, precision: LocationPrecision) -> Self {
        use super::privacy::{location_to_geohash, reduce_coordinate};

        let lat = if lat.is_finite() && (-90.0..=90.0).contains(&lat) {
            lat
        } else {
            0.0
        };
        let lon = if lon.is_finite() && (-180.0..=180.0).contains(&lon) {
            lon
        } else {
            0.0
        };

        let latitude = reduce_coordinate(lat, precision);
        let longitude = reduce_coordinate(lon, precision);
        let now = Utc::now();

        Self {
            latitude,
            longitude,
            geohash: location_to_geohash(latitude, longitude, 8),
            timestamp: now,
            expires_at: now + Duration::hours(DEFAULT_TTL_HOURS),
            precision,
        }
    }

    /// Returns whether this record has expired at `now`.
    ///
    /// A record with `expires_at` exactly equal to `now` is not expired.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Returns whether the record satisfies its structural invariant
    /// (`expires_at > timestamp`). Inbound records that fail this were
    /// produced by a misbehaving peer.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.expires_at > self.timestamp
    }

    /// Classifies this record's freshness at `now`.
    #[must_use]
    pub fn freshness_at(&self, now: DateTime<Utc>) -> Freshness {
        Freshness::classify(now - self.timestamp)
    }

    /// Deserializes a record from its JSON wire body.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or missing required fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes this record to its JSON wire body.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (extremely rare).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A decrypted inbound location: who sent it, and what they shared.
#[derive(Debug, Clone)]
pub struct IncomingLocation {
    /// The sender's public identifier.
    pub sender: MemberId,
    /// The shared location record.
    pub record: LocationRecord,
}

/// A peer location enriched for display.
#[derive(Debug, Clone)]
pub struct MemberLocation {
    /// The sender's public identifier.
    pub member: MemberId,
    /// Display name from the local directory, if the sender is a known
    /// circle member.
    pub display_name: Option<String>,
    /// The shared location record.
    pub record: LocationRecord,
    /// Freshness at the time of the fetch.
    pub freshness: Freshness,
}
