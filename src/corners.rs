//! Corner resolution from classified line segments.
//!
//! Segments split into horizontal and vertical families by slope dominance;
//! the extremal member of each family bounds the grid, and the four corners
//! are pairwise algebraic line intersections. Parallel or coincident border
//! lines make an intersection undefined and fail the resolution instead of
//! producing unbounded coordinates.

use crate::error::ScanError;
use crate::types::{LineSegment, Orientation, Point, Quadrilateral};

const DENOM_EPS: f32 = 1e-6;

/// Intersection of the infinite lines through two segments.
pub fn intersect(a: &LineSegment, b: &LineSegment) -> Result<Point, ScanError> {
    let (x1, y1, x2, y2) = (a.x1, a.y1, a.x2, a.y2);
    let (x3, y3, x4, y4) = (b.x1, b.y1, b.x2, b.y2);

    let d = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if d.abs() < DENOM_EPS {
        return Err(ScanError::ParallelLines);
    }
    let cross_a = x1 * y2 - y1 * x2;
    let cross_b = x3 * y4 - y3 * x4;
    let x = (cross_a * (x3 - x4) - (x1 - x2) * cross_b) / d;
    let y = (cross_a * (y3 - y4) - (y1 - y2) * cross_b) / d;
    Ok(Point::new(x, y))
}

/// Extremal border segments of the two families.
struct BorderLines {
    top: LineSegment,
    bottom: LineSegment,
    left: LineSegment,
    right: LineSegment,
}

fn select_borders(segments: &[LineSegment]) -> Result<BorderLines, ScanError> {
    let mut top: Option<LineSegment> = None;
    let mut bottom: Option<LineSegment> = None;
    let mut left: Option<LineSegment> = None;
    let mut right: Option<LineSegment> = None;

    for seg in segments {
        match seg.orientation() {
            Some(Orientation::Horizontal) => {
                if top.is_none_or(|t| seg.min_y() < t.min_y()) {
                    top = Some(*seg);
                }
                if bottom.is_none_or(|b| seg.max_y() > b.max_y()) {
                    bottom = Some(*seg);
                }
            }
            Some(Orientation::Vertical) => {
                if left.is_none_or(|l| seg.min_x() < l.min_x()) {
                    left = Some(*seg);
                }
                if right.is_none_or(|r| seg.max_x() > r.max_x()) {
                    right = Some(*seg);
                }
            }
            None => {}
        }
    }

    match (top, bottom, left, right) {
        (Some(top), Some(bottom), Some(left), Some(right)) => Ok(BorderLines {
            top,
            bottom,
            left,
            right,
        }),
        _ => Err(ScanError::MissingLineFamily),
    }
}

/// Resolve the four grid corners from detected segments.
pub fn resolve_corners(segments: &[LineSegment]) -> Result<Quadrilateral, ScanError> {
    let borders = select_borders(segments)?;
    Ok(Quadrilateral {
        top_left: intersect(&borders.top, &borders.left)?,
        top_right: intersect(&borders.top, &borders.right)?,
        bottom_left: intersect(&borders.bottom, &borders.left)?,
        bottom_right: intersect(&borders.bottom, &borders.right)?,
    })
}
