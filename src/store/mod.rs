//! Record store: the in-memory, spatially indexed set of listings.
//!
//! # Architecture
//!
//! ```text
//! ShiftStore
//! └── RwLock<Option<Arc<GridIndex>>>   (swapped whole on reload)
//!     └── GridIndex
//!         ├── listings: Vec<Listing>        sorted by id
//!         └── cells: (row, col) → [slot]    fixed-size lat/lon grid
//! ```
//!
//! # Thread Safety
//!
//! Queries clone the `Arc` under a read lock and run without any lock.
//! A reload builds the next `GridIndex` outside the lock and takes the
//! write lock only to swap the reference, so a query sees either the old
//! index or the new one, never a mix.

mod grid;
mod reload;
mod snapshot;

pub use grid::GridIndex;
pub use reload::spawn_reloader;
pub use snapshot::ShiftStore;

use crate::domain::Listing;
use crate::geo::BoundingBox;

/// Read access to a set of listings by region.
pub trait RecordStore {
    /// Listings whose location lies inside `region`, each at most once,
    /// ordered by `id`. Regions crossing the antimeridian are allowed.
    /// An empty region yields an empty vec.
    fn all_in_region(&self, region: &BoundingBox) -> Vec<&Listing>;

    fn len(&self) -> usize;
}
