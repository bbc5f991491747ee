//! Spherical geometry for proximity queries.
//!
//! # Coordinate System
//!
//! - Latitude: degrees north, `[-90, 90]`
//! - Longitude: degrees east, `[-180, 180]`; `180` is treated as `-180`
//! - Distance: meters on a sphere of [`EARTH_RADIUS_M`]
//!
//! [`BoundingBox::around`] gives a cheap rectangular pre-filter that never
//! misses a point inside the circle; [`GeoPoint::distance_m`] is the exact check.

mod bbox;
mod point;

pub use bbox::BoundingBox;
pub use point::GeoPoint;

#[cfg(test)]
pub use bbox::LonSpan;
#[cfg(test)]
pub use point::haversine_m;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Meters spanned by one degree of latitude on the sphere.
pub const METERS_PER_DEGREE_LAT: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// Floor for `cos(latitude)` when widening the longitude window near poles.
pub const MIN_COS_LAT: f64 = 1e-6;
