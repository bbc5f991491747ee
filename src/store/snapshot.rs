use std::sync::{Arc, RwLock};
use std::time::Instant;

use crate::db::{load_all_shifts, Database};
use crate::errors::ServerError;

use super::{GridIndex, RecordStore};

/// Holder of the current index snapshot.
///
/// Starts empty; queries fail with `StoreUnavailable` until the first
/// successful [`ShiftStore::reload`] or [`ShiftStore::replace`].
pub struct ShiftStore {
    cell_deg: f64,
    current: RwLock<Option<Arc<GridIndex>>>,
}

impl ShiftStore {
    pub fn new(cell_deg: f64) -> Self {
        Self {
            cell_deg,
            current: RwLock::new(None),
        }
    }

    /// The index every query of this request will read through.
    pub fn snapshot(&self) -> Result<Arc<GridIndex>, ServerError> {
        let guard = self
            .current
            .read()
            .map_err(|_| ServerError::StoreUnavailable("index lock poisoned".into()))?;
        guard
            .clone()
            .ok_or_else(|| ServerError::StoreUnavailable("index not loaded yet".into()))
    }

    /// Install a prebuilt index. The write lock covers only the swap.
    pub fn replace(&self, index: GridIndex) -> Result<(), ServerError> {
        let next = Arc::new(index);
        let mut guard = self
            .current
            .write()
            .map_err(|_| ServerError::StoreUnavailable("index lock poisoned".into()))?;
        *guard = Some(next);
        Ok(())
    }

    /// Re-read the whole `shifts` table and swap in a fresh index.
    ///
    /// On failure the previous snapshot stays in place.
    pub fn reload(&self, db: &Database) -> Result<usize, ServerError> {
        let started = Instant::now();
        let report = db.with_conn(|conn| load_all_shifts(conn))?;
        let skipped = report.skipped;

        let index = GridIndex::build(report.listings, self.cell_deg);
        let count = index.len();
        self.replace(index)?;

        tracing::info!(
            listings = count,
            skipped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "record store reloaded"
        );
        Ok(count)
    }
}
