//! Ordering of matches and their projection into the response schema.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Serialize, Serializer};

use crate::assets::{AssetResolver, Locator};
use crate::filter::Match;

/// Nearest first; equal distances fall back to ascending id.
pub fn rank(mut matches: Vec<Match<'_>>) -> Vec<Match<'_>> {
    matches.sort_by(|a, b| {
        a.distance_m
            .total_cmp(&b.distance_m)
            .then_with(|| a.listing.id.cmp(&b.listing.id))
    });
    matches
}

/// Window over an already ranked sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Page {
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

/// One element of the `/getworks` response array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    pub id: i64,
    pub company_name: String,
    pub address: String,
    pub work_type_name: String,
    pub customer_rating: f64,
    pub customer_feedbacks_count: i64,
    pub current_workers: i64,
    pub plan_workers: i64,
    pub date_start: NaiveDate,
    #[serde(serialize_with = "clock_time")]
    pub time_start: NaiveTime,
    #[serde(serialize_with = "clock_time")]
    pub time_end: NaiveTime,
    pub price_worker: f64,
    pub logo: Option<Locator>,
    pub latitude: f64,
    pub longitude: f64,
    /// Meters from the query point, one decimal.
    pub distance_m: f64,
}

fn clock_time<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
    let text = if t.second() == 0 {
        t.format("%H:%M").to_string()
    } else {
        t.format("%H:%M:%S").to_string()
    };
    s.serialize_str(&text)
}

/// Shape ranked matches for the client, resolving logos on the way.
pub fn project(ranked: &[Match<'_>], resolver: &dyn AssetResolver) -> Vec<ListingView> {
    ranked
        .iter()
        .map(|m| {
            let l = m.listing;
            ListingView {
                id: l.id,
                company_name: l.company_name.clone(),
                address: l.address.clone(),
                work_type_name: l.work_type_name.clone(),
                customer_rating: l.customer_rating,
                customer_feedbacks_count: l.customer_feedbacks_count,
                current_workers: l.current_workers,
                plan_workers: l.plan_workers,
                date_start: l.date_start,
                time_start: l.time_start,
                time_end: l.time_end,
                price_worker: l.price_worker,
                logo: l.logo.as_deref().and_then(|id| resolver.resolve(id)),
                latitude: l.location.lat,
                longitude: l.location.lon,
                distance_m: (m.distance_m * 10.0).round() / 10.0,
            }
        })
        .collect()
}
