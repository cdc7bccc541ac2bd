//! Grid boundary location.
//!
//! Two interchangeable strategies, kept from the two orchestrations found in
//! the field:
//! - [`contour`] traces closed outer outlines and keeps the largest enclosed
//!   area. Default; works when the binarized frame is fully connected.
//! - [`scan`] walks rows/columns from one third in from each image edge and
//!   declares the first clean line the border. Fallback for low-contrast
//!   shots where the outline breaks up.
//!
//! The contour winner is reduced to its bounding extent, an axis-aligned
//! over-approximation the rectifier squares up. Strongly rotated grids make
//! those extent corners drift from the true geometric corners; that
//! approximation is accepted here, not corrected.

pub mod contour;
pub mod scan;

pub use contour::{locate_by_contour, ContourBoundary};
pub use scan::{locate_by_scan, BorderScanParams, GridBounds};

use serde::{Deserialize, Serialize};

/// Which boundary algorithm the pipeline runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryStrategy {
    #[default]
    Contour,
    BorderScan,
}
