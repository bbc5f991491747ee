use std::f64::consts::FRAC_PI_2;

use super::{GeoPoint, EARTH_RADIUS_M, METERS_PER_DEGREE_LAT, MIN_COS_LAT};

/// A closed longitude interval inside `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonSpan {
    pub min: f64,
    pub max: f64,
}

impl LonSpan {
    pub const FULL: LonSpan = LonSpan {
        min: -180.0,
        max: 180.0,
    };
}

/// Latitude/longitude rectangle used as a pre-filter.
///
/// `min_lon`/`max_lon` may fall outside `[-180, 180]`, or arrive with
/// `min_lon > max_lon`; both describe a box crossing the antimeridian and
/// are resolved by [`BoundingBox::lon_spans`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Smallest box guaranteed to contain the spherical cap of `radius_m`
    /// around `center`.
    ///
    /// Latitude half-width is `radius / metersPerDegreeLat`. Longitude
    /// half-width is `asin(sin(d) / cos(lat))`, with `cos(lat)` floored at
    /// [`MIN_COS_LAT`]; once the cap reaches a pole or the ratio hits 1,
    /// every longitude is in play.
    pub fn around(center: &GeoPoint, radius_m: f64) -> Self {
        let d_lat = radius_m / METERS_PER_DEGREE_LAT;
        let min_lat = center.lat - d_lat;
        let max_lat = center.lat + d_lat;

        if min_lat <= -90.0 || max_lat >= 90.0 {
            return Self::new(min_lat.max(-90.0), max_lat.min(90.0), -180.0, 180.0);
        }

        let angular = radius_m / EARTH_RADIUS_M;
        if angular >= FRAC_PI_2 {
            return Self::new(min_lat, max_lat, -180.0, 180.0);
        }

        let cos_lat = center.lat.to_radians().cos().max(MIN_COS_LAT);
        let ratio = angular.sin() / cos_lat;
        if ratio >= 1.0 {
            return Self::new(min_lat, max_lat, -180.0, 180.0);
        }

        let d_lon = ratio.asin().to_degrees();
        Self::new(min_lat, max_lat, center.lon - d_lon, center.lon + d_lon)
    }

    /// Longitude ranges to scan: one normally, two across the antimeridian.
    pub fn lon_spans(&self) -> Vec<LonSpan> {
        let (min, max) = (self.min_lon, self.max_lon);

        if max - min >= 360.0 {
            return vec![LonSpan::FULL];
        }
        if min < -180.0 {
            return vec![
                LonSpan { min: min + 360.0, max: 180.0 },
                LonSpan { min: -180.0, max },
            ];
        }
        if max > 180.0 {
            return vec![
                LonSpan { min, max: 180.0 },
                LonSpan { min: -180.0, max: max - 360.0 },
            ];
        }
        if min > max {
            return vec![
                LonSpan { min, max: 180.0 },
                LonSpan { min: -180.0, max },
            ];
        }
        vec![LonSpan { min, max }]
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && self.contains_lon(lon)
    }

    fn contains_lon(&self, lon: f64) -> bool {
        let min = self.min_lon;
        let max = if self.max_lon < min {
            self.max_lon + 360.0
        } else {
            self.max_lon
        };
        if max - min >= 360.0 {
            return true;
        }
        // Bring `lon` into [min, min + 360) and compare there.
        min + (lon - min).rem_euclid(360.0) <= max
    }
}
