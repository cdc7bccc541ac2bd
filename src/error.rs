//! Structural failure taxonomy for the scan pipeline.
//!
//! Every variant aborts the whole scan: a wrong grid is worse than no grid
//! for a solver consuming it. Per-cell recognition failures are not errors;
//! they surface as [`crate::types::Cell::Unrecognized`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// No closed outline or clean border candidate was found.
    #[error("no grid boundary found")]
    NoBoundary,

    /// Corner resolution needs at least one horizontal and one vertical
    /// segment; one family was empty.
    #[error("no horizontal or vertical line segments to intersect")]
    MissingLineFamily,

    /// Two border lines were parallel or coincident at corner resolution.
    #[error("border lines are parallel; corner intersection undefined")]
    ParallelLines,

    /// The corner quad admits no invertible perspective transform.
    #[error("corner quadrilateral is degenerate; cannot rectify")]
    DegenerateQuad,

    /// Boundary candidate failed the squareness check. Reported separately
    /// from the geometry failures for caller diagnostics.
    #[error("boundary is not square: {width}x{height}")]
    NotSquare { width: u32, height: u32 },

    /// Occupied-cell count disagrees with the extracted blob count; the
    /// segmentation is inconsistent and digits cannot be assigned safely.
    #[error("segmentation inconsistency: {occupied} occupied cells vs {blobs} blobs")]
    CountMismatch { occupied: usize, blobs: usize },
}
