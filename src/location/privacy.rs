//! Coordinate reduction and geohash encoding.
//!
//! Locations are reduced to their precision tier on the sending device,
//! before encryption; nothing finer-grained ever leaves it.

use super::types::LocationPrecision;

/// Reduces a coordinate to the decimal places of the given tier.
///
/// Non-finite input reduces to 0.0; range validation is the caller's
/// responsibility.
#[must_use]
pub fn reduce_coordinate(coord: f64, precision: LocationPrecision) -> f64 {
    if !coord.is_finite() {
        return 0.0;
    }

    let multiplier = 10_f64.powi(precision.decimal_places());
    (coord * multiplier).round() / multiplier
}

/// Encodes latitude/longitude as a geohash of the given length.
///
/// Length 8 (~19 m cell) matches Enhanced-tier coordinates. Returns an
/// empty string for coordinates outside the valid range.
#[must_use]
pub fn location_to_geohash(lat: f64, lon: f64, length: u8) -> String {
    geohash::encode(geohash::Coord { x: lon, y: lat }, length as usize)
        .unwrap_or_else(|_| String::new())
}

/// Decodes a geohash to the center of its cell, as (latitude, longitude).
///
/// Returns (0.0, 0.0) for an undecodable string.
#[must_use]
pub fn geohash_to_location(hash: &str) -> (f64, f64) {
    geohash::decode(hash).map_or((0.0, 0.0), |(coord, _, _)| (coord.y, coord.x))
}
