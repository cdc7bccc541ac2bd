//! Parameter types configuring the scan stages.
//!
//! Defaults reproduce the field-proven behavior: 11×11 mean threshold with
//! offset 2, contour boundary with border-scan fallback available, size-4
//! cross dilation, 5 px tile trim. All types deserialize from the demo's
//! JSON config with every field optional.

use crate::binarize::BinarizeParams;
use crate::blobs::BlobParams;
use crate::boundary::{BorderScanParams, BoundaryStrategy};
use crate::tiles::TileParams;
use serde::{Deserialize, Serialize};

/// Scanner-wide parameters covering every pipeline stage.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanParams {
    /// Adaptive-threshold binarization knobs.
    pub binarize: BinarizeParams,
    /// Which boundary locator runs.
    pub strategy: BoundaryStrategy,
    /// Border-scan margins and squareness tolerance; only consulted when
    /// `strategy` is [`BoundaryStrategy::BorderScan`].
    pub border_scan: BorderScanParams,
    /// Dilation, re-threshold and speckle filtering.
    pub blob: BlobParams,
    /// Lattice trim and occupancy threshold.
    pub tile: TileParams,
}
