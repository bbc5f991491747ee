//! Fixed-resolution latitude/longitude grid over an immutable listing set.

use std::collections::HashMap;

use crate::domain::Listing;
use crate::geo::BoundingBox;

use super::RecordStore;

/// Grid cell address: row counts up from the south pole, col from -180°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellKey {
    row: i32,
    col: i32,
}

/// Immutable spatial index. Built once per reload, then only read.
#[derive(Debug)]
pub struct GridIndex {
    cell_deg: f64,
    rows: i32,
    cols: i32,
    /// Sorted by id, ids unique.
    listings: Vec<Listing>,
    /// Occupied cells only; values are positions in `listings`.
    cells: HashMap<CellKey, Vec<usize>>,
}

impl GridIndex {
    /// Index `listings` on a grid of `cell_deg`-degree cells.
    ///
    /// When several listings share an id the first one wins.
    pub fn build(mut listings: Vec<Listing>, cell_deg: f64) -> Self {
        // Stable sort keeps the first occurrence of a duplicated id in front.
        listings.sort_by_key(|l| l.id);
        let before = listings.len();
        listings.dedup_by_key(|l| l.id);
        if listings.len() < before {
            tracing::warn!(
                dropped = before - listings.len(),
                "duplicate listing ids in record set"
            );
        }

        let mut index = Self {
            cell_deg,
            rows: (180.0 / cell_deg).ceil() as i32,
            cols: (360.0 / cell_deg).ceil() as i32,
            listings: Vec::new(),
            cells: HashMap::new(),
        };

        for (slot, listing) in listings.iter().enumerate() {
            let key = index.cell_of(listing.location.lat, listing.location.lon);
            index.cells.entry(key).or_default().push(slot);
        }
        index.listings = listings;
        index
    }

    fn row_of(&self, lat: f64) -> i32 {
        (((lat + 90.0) / self.cell_deg).floor() as i32).clamp(0, self.rows - 1)
    }

    fn col_of(&self, lon: f64) -> i32 {
        (((lon + 180.0) / self.cell_deg).floor() as i32).clamp(0, self.cols - 1)
    }

    fn cell_of(&self, lat: f64, lon: f64) -> CellKey {
        CellKey {
            row: self.row_of(lat),
            col: self.col_of(lon),
        }
    }
}

impl RecordStore for GridIndex {
    fn all_in_region(&self, region: &BoundingBox) -> Vec<&Listing> {
        // Also rejects NaN bounds.
        if !(region.min_lat <= region.max_lat) {
            return Vec::new();
        }

        let spans = region.lon_spans();
        let (r0, r1) = (self.row_of(region.min_lat), self.row_of(region.max_lat));

        let mut slots: Vec<usize> = Vec::new();
        for span in &spans {
            let (c0, c1) = (self.col_of(span.min), self.col_of(span.max));
            let wanted = (r1 - r0 + 1) as usize * (c1 - c0 + 1) as usize;

            if wanted > self.cells.len() {
                // Box larger than the occupied grid: walk occupied cells instead.
                for (key, bucket) in &self.cells {
                    if (r0..=r1).contains(&key.row) && (c0..=c1).contains(&key.col) {
                        slots.extend_from_slice(bucket);
                    }
                }
            } else {
                for row in r0..=r1 {
                    for col in c0..=c1 {
                        if let Some(bucket) = self.cells.get(&CellKey { row, col }) {
                            slots.extend_from_slice(bucket);
                        }
                    }
                }
            }
        }

        // Slot order is id order; dedup covers overlapping spans.
        slots.sort_unstable();
        slots.dedup();

        slots
            .into_iter()
            .map(|slot| &self.listings[slot])
            .filter(|l| region.contains(l.location.lat, l.location.lon))
            .collect()
    }

    fn len(&self) -> usize {
        self.listings.len()
    }
}
