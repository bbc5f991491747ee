use std::fmt;

use crate::errors::ServerError;

use super::EARTH_RADIUS_M;

/// A validated coordinate pair, in degrees. Longitude is kept in
/// `[-180, 180)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Validate and build a point.
    ///
    /// Accepts `lon == 180.0` and folds it onto `-180.0`, the same
    /// meridian. Anything non-finite or out of range is an `InvalidQuery`.
    pub fn new(lat: f64, lon: f64) -> Result<Self, ServerError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ServerError::InvalidQuery(format!(
                "latitude {lat} outside [-90, 90]"
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(ServerError::InvalidQuery(format!(
                "longitude {lon} outside [-180, 180]"
            )));
        }
        let lon = if lon == 180.0 { -180.0 } else { lon };
        Ok(Self { lat, lon })
    }

    /// Great-circle distance to `other`, in meters.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        haversine_m((self.lat, self.lon), (other.lat, other.lon))
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Great-circle distance between two `(lat, lon)` pairs in degrees.
///
/// Haversine form, well conditioned for the short distances a catchment
/// radius covers. Longitude differences across the antimeridian need no
/// special casing since only `sin²(Δλ/2)` enters the formula.
pub fn haversine_m(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points.
    let c = 2.0 * a.min(1.0).sqrt().asin();

    EARTH_RADIUS_M * c
}
