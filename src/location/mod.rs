//! Location sharing pipeline and data types.
//!
//! Coordinates are reduced to their precision tier on the sending device
//! and carry capture and expiry timestamps; expired records are never
//! surfaced. Peer locations are deduplicated by event identifier, kept
//! latest-per-sender, and classified by freshness for display.

mod dedup;
mod pipeline;
pub mod privacy;
pub mod types;

pub use dedup::SeenEvents;
pub use pipeline::LocationPipeline;
pub use privacy::{geohash_to_location, location_to_geohash, reduce_coordinate};
pub use types::{Freshness, IncomingLocation, LocationPrecision, LocationRecord, MemberLocation};
