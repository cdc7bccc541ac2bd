//! Mapping extracted blobs onto the 9×9 cell lattice.
//!
//! Blob rects are painted into a mask the size of the rectified grid; each
//! lattice cell then samples its own trimmed interior and counts painted
//! pixels. The trim keeps cell-border ink from leaking into the occupancy
//! decision. Before any digit is assigned, the number of occupied cells must
//! equal the number of blobs; a mismatch means segmentation and mapping
//! disagree and the scan is aborted rather than misassigning digits.

use crate::blobs::Blob;
use crate::error::ScanError;
use crate::types::BoundingRect;
use log::debug;
use serde::{Deserialize, Serialize};

pub const GRID_SIZE: usize = 9;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TileParams {
    /// Pixels trimmed off the far edges of each cell interior.
    pub margin: usize,
    /// Fraction of a cell's trimmed interior that must be painted for the
    /// cell to count as occupied. `0.0` reproduces the legacy any-pixel
    /// behavior of earlier releases.
    pub min_fill_ratio: f32,
}

impl Default for TileParams {
    fn default() -> Self {
        Self {
            margin: 5,
            min_fill_ratio: 0.01,
        }
    }
}

/// Boolean occupancy per lattice cell, fixed row-major traversal.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct OccupancyGrid {
    cells: [[bool; GRID_SIZE]; GRID_SIZE],
}

impl OccupancyGrid {
    #[inline]
    pub fn occupied(&self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&c| c).count()
    }

    /// Row-major iterator over `(row, col, occupied)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        (0..GRID_SIZE).flat_map(move |r| (0..GRID_SIZE).map(move |c| (r, c, self.cells[r][c])))
    }
}

/// Occupancy of every cell from the blob bounding rects.
pub fn map_tiles(w: usize, h: usize, rects: &[BoundingRect], params: &TileParams) -> OccupancyGrid {
    let mut painted = vec![false; w * h];
    for r in rects {
        let x1 = (r.right() as usize).min(w);
        let y1 = (r.bottom() as usize).min(h);
        for y in r.y as usize..y1 {
            for x in r.x as usize..x1 {
                painted[y * w + x] = true;
            }
        }
    }

    let cell_w = w / GRID_SIZE;
    let cell_h = h / GRID_SIZE;
    let mut cells = [[false; GRID_SIZE]; GRID_SIZE];
    for (row, out_row) in cells.iter_mut().enumerate() {
        let y0 = row * cell_h;
        let y1 = y0 + cell_h.saturating_sub(params.margin);
        for (col, out) in out_row.iter_mut().enumerate() {
            let x0 = col * cell_w;
            let x1 = x0 + cell_w.saturating_sub(params.margin);
            let mut marked = 0usize;
            for y in y0..y1.min(h) {
                for x in x0..x1.min(w) {
                    if painted[y * w + x] {
                        marked += 1;
                    }
                }
            }
            let interior = (y1 - y0) * (x1 - x0);
            *out = marked as f32 > params.min_fill_ratio * interior as f32;
        }
    }
    OccupancyGrid { cells }
}

/// Cell index of a rect's centre, clamped to the lattice.
fn cell_of(rect: &BoundingRect, w: usize, h: usize) -> (usize, usize) {
    let (cx, cy) = rect.center();
    let col = ((cx as usize) * GRID_SIZE / w.max(1)).min(GRID_SIZE - 1);
    let row = ((cy as usize) * GRID_SIZE / h.max(1)).min(GRID_SIZE - 1);
    (row, col)
}

/// Order blobs row-major by the lattice cell containing each rect centre, so
/// the i-th blob pairs with the i-th occupied cell of the traversal.
pub fn order_blobs_row_major(w: usize, h: usize, mut blobs: Vec<Blob>) -> Vec<Blob> {
    blobs.sort_by_key(|b| {
        let (row, col) = cell_of(&b.rect, w, h);
        row * GRID_SIZE + col
    });
    blobs
}

/// Occupied cells and blobs must agree before any assignment happens.
pub fn verify_blob_count(occupancy: &OccupancyGrid, blob_count: usize) -> Result<(), ScanError> {
    let occupied = occupancy.occupied_count();
    debug!("tiles: {occupied} occupied cells, {blob_count} blobs");
    if occupied != blob_count {
        return Err(ScanError::CountMismatch {
            occupied,
            blobs: blob_count,
        });
    }
    Ok(())
}
