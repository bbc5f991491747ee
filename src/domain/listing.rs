// src/domain/listing.rs

use chrono::{NaiveDate, NaiveTime};

use crate::geo::GeoPoint;

/// A shift listing as held by the record store.
///
/// Values are taken as stored. `current_workers <= plan_workers` and
/// `time_start < time_end` are not assumed: overnight shifts and
/// over-booked shifts both exist upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: i64,
    pub location: GeoPoint,

    pub company_name: String,
    pub address: String,
    pub work_type_name: String,

    pub customer_rating: f64,
    pub customer_feedbacks_count: i64,

    pub current_workers: i64,
    pub plan_workers: i64,

    pub date_start: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,

    pub price_worker: f64,
    /// Opaque asset identifier; `None` means no image.
    pub logo: Option<String>,
}

/// Accepts ISO dates and the day-first dotted form.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d.%m.%Y"))
        .ok()
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}
