// src/db/shifts.rs
use rusqlite::{Connection, Row};

use crate::domain::listing::{parse_date, parse_time, Listing};
use crate::errors::ServerError;
use crate::geo::GeoPoint;

const SQL_ALL_SHIFTS: &str = include_str!("../../sql/shifts_all.sql");

/// Result of a bulk read of the `shifts` table.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Decoded listings in ascending `id` order.
    pub listings: Vec<Listing>,
    /// Rows that could not be turned into a listing.
    pub skipped: usize,
}

/// Column values exactly as SQLite hands them over.
struct ShiftRow {
    id: i64,
    latitude: f64,
    longitude: f64,
    company_name: Option<String>,
    address: Option<String>,
    work_type_name: Option<String>,
    customer_rating: f64,
    customer_feedbacks_count: i64,
    current_workers: i64,
    plan_workers: i64,
    date_start: String,
    time_start: String,
    time_end: String,
    price_worker: f64,
    logo: Option<String>,
}

impl ShiftRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            latitude: row.get(1)?,
            longitude: row.get(2)?,
            company_name: row.get(3)?,
            address: row.get(4)?,
            work_type_name: row.get(5)?,
            customer_rating: row.get(6)?,
            customer_feedbacks_count: row.get(7)?,
            current_workers: row.get(8)?,
            plan_workers: row.get(9)?,
            date_start: row.get(10)?,
            time_start: row.get(11)?,
            time_end: row.get(12)?,
            price_worker: row.get(13)?,
            logo: row.get(14)?,
        })
    }

    fn into_listing(self) -> Result<Listing, String> {
        let location = GeoPoint::new(self.latitude, self.longitude).map_err(|e| e.to_string())?;
        let date_start = parse_date(&self.date_start)
            .ok_or_else(|| format!("bad date_start {:?}", self.date_start))?;
        let time_start = parse_time(&self.time_start)
            .ok_or_else(|| format!("bad time_start {:?}", self.time_start))?;
        let time_end =
            parse_time(&self.time_end).ok_or_else(|| format!("bad time_end {:?}", self.time_end))?;

        Ok(Listing {
            id: self.id,
            location,
            company_name: self.company_name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            work_type_name: self.work_type_name.unwrap_or_default(),
            customer_rating: self.customer_rating,
            customer_feedbacks_count: self.customer_feedbacks_count,
            current_workers: self.current_workers,
            plan_workers: self.plan_workers,
            date_start,
            time_start,
            time_end,
            price_worker: self.price_worker,
            logo: self.logo.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// Read every shift. Undecodable rows are logged and skipped.
pub fn load_all_shifts(conn: &Connection) -> Result<LoadReport, ServerError> {
    let mut stmt = conn.prepare(SQL_ALL_SHIFTS)?;
    let rows = stmt.query_map([], ShiftRow::from_row)?;

    let mut report = LoadReport::default();
    for (n, row) in rows.enumerate() {
        let decoded = row
            .map_err(|e| e.to_string())
            .and_then(ShiftRow::into_listing);
        match decoded {
            Ok(listing) => report.listings.push(listing),
            Err(reason) => {
                tracing::warn!(row = n, %reason, "skipping shift row");
                report.skipped += 1;
            }
        }
    }
    Ok(report)
}
