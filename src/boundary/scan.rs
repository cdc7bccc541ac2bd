//! Directional border scanning, the fallback boundary strategy.
//!
//! From one third of the way in from each image edge, rows/columns are walked
//! toward that edge; the first line whose central band holds no foreground
//! pixel is that side's border. All four borders then move outward by a fixed
//! margin so the frame is never clipped, and the resulting bounds must be
//! square within a tolerance to count as a Sudoku grid.

use crate::error::ScanError;
use crate::image::GrayU8;
use crate::types::LineSegment;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderScanParams {
    /// Outward expansion applied to every found border, in pixels.
    pub margin: u32,
    /// Maximum |width − height| for the bounds to pass as square.
    pub squareness_tolerance: u32,
}

impl Default for BorderScanParams {
    fn default() -> Self {
        Self {
            margin: 5,
            squareness_tolerance: 25,
        }
    }
}

/// Axis-aligned grid bounds in source-image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl GridBounds {
    #[inline]
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// The four border lines as segments, ready for corner resolution.
    pub fn to_segments(&self) -> [LineSegment; 4] {
        let (l, r) = (self.left as f32, self.right as f32);
        let (t, b) = (self.top as f32, self.bottom as f32);
        [
            LineSegment::new(l, t, r, t),
            LineSegment::new(l, b, r, b),
            LineSegment::new(l, t, l, b),
            LineSegment::new(r, t, r, b),
        ]
    }
}

/// |width − height| within tolerance.
pub fn is_square(bounds: &GridBounds, tolerance: u32) -> bool {
    bounds.width().abs_diff(bounds.height()) <= tolerance
}

/// No foreground in the central fifth-band of column `x`.
fn is_clear_column(mask: GrayU8<'_>, x: usize) -> bool {
    for y in 2 * mask.h / 5..3 * mask.h / 5 {
        if mask.get(x, y) != 0 {
            return false;
        }
    }
    true
}

/// No foreground in the central fifth-band of row `y`.
fn is_clear_row(mask: GrayU8<'_>, y: usize) -> bool {
    for x in 2 * mask.w / 5..3 * mask.w / 5 {
        if mask.get(x, y) != 0 {
            return false;
        }
    }
    true
}

fn scan_left(mask: GrayU8<'_>) -> Option<u32> {
    (0..=mask.w / 3)
        .rev()
        .find(|&x| is_clear_column(mask, x))
        .map(|x| x as u32)
}

fn scan_right(mask: GrayU8<'_>) -> Option<u32> {
    (2 * mask.w / 3..mask.w)
        .find(|&x| is_clear_column(mask, x))
        .map(|x| x as u32)
}

fn scan_top(mask: GrayU8<'_>) -> Option<u32> {
    (0..=mask.h / 3)
        .rev()
        .find(|&y| is_clear_row(mask, y))
        .map(|y| y as u32)
}

fn scan_bottom(mask: GrayU8<'_>) -> Option<u32> {
    (2 * mask.h / 3..mask.h)
        .find(|&y| is_clear_row(mask, y))
        .map(|y| y as u32)
}

/// Locate the grid bounds by border scanning.
///
/// A side whose scan exhausts its range without a clean line fails the whole
/// location; non-square bounds are rejected separately so callers can tell
/// "nothing there" from "there, but not a Sudoku".
pub fn locate_by_scan(mask: GrayU8<'_>, params: &BorderScanParams) -> Result<GridBounds, ScanError> {
    if mask.w == 0 || mask.h == 0 {
        return Err(ScanError::NoBoundary);
    }
    let (left, right, top, bottom) = match (
        scan_left(mask),
        scan_right(mask),
        scan_top(mask),
        scan_bottom(mask),
    ) {
        (Some(l), Some(r), Some(t), Some(b)) => (l, r, t, b),
        _ => return Err(ScanError::NoBoundary),
    };

    let bounds = GridBounds {
        left: left.saturating_sub(params.margin),
        right: (right + params.margin).min(mask.w as u32 - 1),
        top: top.saturating_sub(params.margin),
        bottom: (bottom + params.margin).min(mask.h as u32 - 1),
    };
    debug!(
        "border scan: bounds {}..{} x {}..{}",
        bounds.left, bounds.right, bounds.top, bounds.bottom
    );

    if !is_square(&bounds, params.squareness_tolerance) {
        return Err(ScanError::NotSquare {
            width: bounds.width(),
            height: bounds.height(),
        });
    }
    Ok(bounds)
}
