//! Spatial filter: bounding-box pre-filter, then exact distance refinement.

use crate::domain::Listing;
use crate::errors::ServerError;
use crate::geo::{BoundingBox, GeoPoint};
use crate::store::RecordStore;

/// A listing inside the catchment, with its distance from the query point.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    pub listing: &'a Listing,
    pub distance_m: f64,
}

#[derive(Debug)]
pub struct FilterOutcome<'a> {
    pub matches: Vec<Match<'a>>,
    /// The candidate set hit the safety cap and was cut; some listings
    /// inside the catchment may be missing.
    pub truncated: bool,
    /// Bounding-box candidates seen before refinement.
    pub candidates: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct SpatialFilter {
    radius_m: f64,
    candidate_cap: usize,
}

impl SpatialFilter {
    /// `radius_m` must be finite and > 0, `candidate_cap` > 0.
    pub fn new(radius_m: f64, candidate_cap: usize) -> Result<Self, ServerError> {
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(ServerError::InvalidQuery(format!(
                "catchment radius must be finite and > 0, got {radius_m}"
            )));
        }
        if candidate_cap == 0 {
            return Err(ServerError::InvalidQuery("candidate cap must be > 0".into()));
        }
        Ok(Self {
            radius_m,
            candidate_cap,
        })
    }

    /// Every listing of `store` within the catchment radius of `point`.
    ///
    /// Matches come out in id order; ranking is a separate step. When the
    /// box yields more than `candidate_cap` listings, only the
    /// `candidate_cap` nearest (ties by id) are kept and the outcome is
    /// flagged.
    pub fn find<'a, S>(&self, store: &'a S, point: &GeoPoint) -> FilterOutcome<'a>
    where
        S: RecordStore + ?Sized,
    {
        let bbox = BoundingBox::around(point, self.radius_m);
        let mut candidates: Vec<Match<'a>> = store
            .all_in_region(&bbox)
            .into_iter()
            .map(|listing| Match {
                listing,
                distance_m: point.distance_m(&listing.location),
            })
            .collect();
        let seen = candidates.len();

        let truncated = seen > self.candidate_cap;
        if truncated {
            tracing::warn!(
                candidates = seen,
                cap = self.candidate_cap,
                %point,
                "bounding box overflowed candidate cap; result is partial"
            );
            candidates.select_nth_unstable_by(self.candidate_cap - 1, |a, b| {
                a.distance_m
                    .total_cmp(&b.distance_m)
                    .then(a.listing.id.cmp(&b.listing.id))
            });
            candidates.truncate(self.candidate_cap);
            candidates.sort_unstable_by_key(|m| m.listing.id);
        }

        candidates.retain(|m| m.distance_m <= self.radius_m);

        FilterOutcome {
            matches: candidates,
            truncated,
            candidates: seen,
        }
    }
}
