//! The `/getworks` query path.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;

use crate::assets::AssetResolver;
use crate::errors::ServerError;
use crate::filter::SpatialFilter;
use crate::geo::GeoPoint;
use crate::ranking::{project, rank, ListingView, Page};
use crate::store::ShiftStore;

/// Body of `POST /getworks` as it arrives on the wire.
#[derive(Debug, Deserialize)]
struct RawQuery {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    offset: Option<usize>,
}

/// A validated request. Nothing partially typed gets past [`Query::parse`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    pub point: GeoPoint,
    pub page: Page,
}

impl Query {
    pub fn parse(body: &[u8]) -> Result<Self, ServerError> {
        // Serde would also accept a positional array for the struct.
        match body.iter().find(|b| !b.is_ascii_whitespace()) {
            None => return Err(ServerError::MalformedInput("empty request body".into())),
            Some(b'{') => {}
            Some(_) => {
                return Err(ServerError::MalformedInput("expected a JSON object".into()))
            }
        }
        let raw: RawQuery = serde_json::from_slice(body)
            .map_err(|e| ServerError::MalformedInput(e.to_string()))?;

        Ok(Self {
            point: GeoPoint::new(raw.latitude, raw.longitude)?,
            page: Page {
                offset: raw.offset.unwrap_or(0),
                limit: raw.limit,
            },
        })
    }
}

#[derive(Debug)]
pub struct QueryOutcome {
    pub listings: Vec<ListingView>,
    /// Candidate cap was hit; see [`crate::filter::FilterOutcome::truncated`].
    pub partial: bool,
    /// Bounding-box candidates examined before refinement.
    pub candidates: usize,
}

pub struct QueryService {
    store: Arc<ShiftStore>,
    filter: SpatialFilter,
    resolver: Arc<dyn AssetResolver>,
}

impl QueryService {
    pub fn new(store: Arc<ShiftStore>, filter: SpatialFilter, resolver: Arc<dyn AssetResolver>) -> Self {
        Self {
            store,
            filter,
            resolver,
        }
    }

    pub fn store(&self) -> &ShiftStore {
        &self.store
    }

    /// Parse, validate and answer one raw request body.
    ///
    /// Emits one structured log event per call. A panic anywhere below is
    /// contained here and reported as `StoreUnavailable`.
    pub fn handle(&self, body: &[u8]) -> Result<QueryOutcome, ServerError> {
        let started = Instant::now();

        let query = match Query::parse(body) {
            Ok(q) => q,
            Err(e) => {
                tracing::info!(error = %e, code = e.code(), "getworks rejected");
                return Err(e);
            }
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.run(&query)))
            .unwrap_or_else(|payload| {
                tracing::error!(
                    panic = %panic_message(payload.as_ref()),
                    latitude = query.point.lat,
                    longitude = query.point.lon,
                    "getworks panicked"
                );
                Err(ServerError::StoreUnavailable("internal fault".into()))
            });

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(outcome) => tracing::info!(
                latitude = query.point.lat,
                longitude = query.point.lon,
                matches = outcome.listings.len(),
                candidates = outcome.candidates,
                partial = outcome.partial,
                elapsed_ms,
                "getworks"
            ),
            Err(e) => tracing::warn!(
                latitude = query.point.lat,
                longitude = query.point.lon,
                error = %e,
                code = e.code(),
                elapsed_ms,
                "getworks failed"
            ),
        }
        result
    }

    /// Answer an already validated query against the current snapshot.
    pub fn run(&self, query: &Query) -> Result<QueryOutcome, ServerError> {
        let snapshot = self.store.snapshot()?;
        let found = self.filter.find(snapshot.as_ref(), &query.point);
        let (partial, candidates) = (found.truncated, found.candidates);

        let ranked = query.page.apply(rank(found.matches));
        Ok(QueryOutcome {
            listings: project(&ranked, self.resolver.as_ref()),
            partial,
            candidates,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
