//! Largest-outline boundary detection.
//!
//! Components are labeled in raster order, each outer boundary is traced with
//! Moore neighbor following, and the outline enclosing the most area wins.
//! Enclosed (shoelace) area, not pixel count, does the ranking: the grid
//! frame is a thin hollow square whose ink covers few pixels but encloses
//! most of the photo.

use crate::error::ScanError;
use crate::image::GrayU8;
use crate::labels::{label_components, Component};
use crate::types::Quadrilateral;
use log::debug;

/// Winning outline with its bounding-extent quad.
#[derive(Clone, Debug)]
pub struct ContourBoundary {
    /// Traced outer boundary of the winning component, pixel coordinates.
    pub outline: Vec<(u32, u32)>,
    /// Enclosed area of the outline, shoelace formula.
    pub area: f32,
    /// Bounding extent of the outline reduced to four corners; this, not the
    /// raw polygon, feeds rectification.
    pub quad: Quadrilateral,
}

/// Clockwise 8-neighborhood ring: E, SE, S, SW, W, NW, N, NE.
const RING: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const WEST: usize = 4;

#[inline]
fn ring_index(dx: isize, dy: isize) -> usize {
    RING.iter().position(|&d| d == (dx, dy)).unwrap_or(WEST)
}

/// Moore neighbor tracing from a component's raster-first pixel.
///
/// The seed is the topmost-leftmost pixel of its component, so its west and
/// north neighbors are guaranteed background and the trace may enter from
/// the west. Terminates on revisiting the seed with the original backtrack
/// (Jacob's criterion) or at a hard step cap for pathological masks.
fn trace_outline(mask: GrayU8<'_>, seed: (u32, u32)) -> Vec<(u32, u32)> {
    let (w, h) = (mask.w as isize, mask.h as isize);
    let fg = |x: isize, y: isize| {
        x >= 0 && y >= 0 && x < w && y < h && mask.get(x as usize, y as usize) != 0
    };

    let start = (seed.0 as isize, seed.1 as isize);
    let mut outline = vec![seed];
    let mut p = start;
    let mut bdir = WEST;

    let cap = 4 * (mask.w * mask.h).max(16);
    for _ in 0..cap {
        let mut advanced = false;
        for i in 1..=8 {
            let d = (bdir + i) % 8;
            let np = (p.0 + RING[d].0, p.1 + RING[d].1);
            if !fg(np.0, np.1) {
                continue;
            }
            // the neighbor checked just before np is background; it becomes
            // the new backtrack, re-expressed relative to np
            let prev = (bdir + i - 1) % 8;
            let bpix = (p.0 + RING[prev].0, p.1 + RING[prev].1);
            bdir = ring_index(bpix.0 - np.0, bpix.1 - np.1);
            p = np;
            advanced = true;
            break;
        }
        if !advanced {
            // isolated pixel
            break;
        }
        if p == start && bdir == WEST {
            break;
        }
        outline.push((p.0 as u32, p.1 as u32));
    }
    outline
}

/// Enclosed polygon area via the shoelace formula.
fn shoelace_area(points: &[(u32, u32)]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0f64;
    for i in 0..points.len() {
        let (x0, y0) = points[i];
        let (x1, y1) = points[(i + 1) % points.len()];
        acc += x0 as f64 * y1 as f64 - x1 as f64 * y0 as f64;
    }
    (acc.abs() * 0.5) as f32
}

fn extent_quad(c: &Component) -> Quadrilateral {
    Quadrilateral::from_extent(c.min_x as f32, c.min_y as f32, c.max_x as f32, c.max_y as f32)
}

/// Trace all outer outlines and keep the one enclosing the most area.
///
/// Fails when no outline exists or when the winner is outline 0: index 0
/// doubles as the no-winner sentinel, so a grid traced first counts as not
/// found. Binarized photos carry speckle ahead of the frame in raster order.
pub fn locate_by_contour(mask: GrayU8<'_>) -> Result<ContourBoundary, ScanError> {
    let map = label_components(mask);
    if map.components.is_empty() {
        return Err(ScanError::NoBoundary);
    }

    let mut best_index = 0usize;
    let mut best_area = 0.0f32;
    let mut best_outline: Option<Vec<(u32, u32)>> = None;

    for (idx, comp) in map.components.iter().enumerate() {
        let outline = trace_outline(mask, comp.seed);
        let area = shoelace_area(&outline);
        if area > best_area {
            best_area = area;
            best_index = idx;
            best_outline = Some(outline);
        }
    }
    debug!(
        "contour: {} outlines, winner index {} area {:.1}",
        map.components.len(),
        best_index,
        best_area
    );

    if best_index == 0 {
        return Err(ScanError::NoBoundary);
    }
    let outline = best_outline.unwrap_or_default();
    let quad = extent_quad(&map.components[best_index]);
    Ok(ContourBoundary {
        outline,
        area: best_area,
        quad,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayBuffer;

    fn blank(w: usize, h: usize) -> GrayBuffer {
        GrayBuffer::new(w, h)
    }

    fn draw_square_frame(buf: &mut GrayBuffer, x0: usize, y0: usize, side: usize) {
        for i in 0..side {
            buf.set(x0 + i, y0, 255);
            buf.set(x0 + i, y0 + side - 1, 255);
            buf.set(x0, y0 + i, 255);
            buf.set(x0 + side - 1, y0 + i, 255);
        }
    }

    fn fill_rect(buf: &mut GrayBuffer, x0: usize, y0: usize, w: usize, h: usize) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                buf.set(x, y, 255);
            }
        }
    }

    #[test]
    fn empty_mask_is_no_boundary() {
        let buf = blank(32, 32);
        assert_eq!(
            locate_by_contour(buf.as_view()).unwrap_err(),
            ScanError::NoBoundary
        );
    }

    #[test]
    fn winner_at_index_zero_is_rejected() {
        let mut buf = blank(64, 64);
        // single frame: traced first, so it can never win
        draw_square_frame(&mut buf, 8, 8, 40);
        assert_eq!(
            locate_by_contour(buf.as_view()).unwrap_err(),
            ScanError::NoBoundary
        );
    }

    #[test]
    fn largest_enclosed_area_wins_over_pixel_count() {
        let mut buf = blank(100, 100);
        // dense blob first (many pixels, little enclosed area), then a
        // hollow frame enclosing far more area
        fill_rect(&mut buf, 2, 2, 12, 12);
        draw_square_frame(&mut buf, 20, 20, 70);
        let found = locate_by_contour(buf.as_view()).expect("frame should win");
        assert!(found.area > 60.0 * 60.0, "area {:.1} too small", found.area);
        let q = found.quad;
        assert_eq!((q.top_left.x as u32, q.top_left.y as u32), (20, 20));
        assert_eq!((q.bottom_right.x as u32, q.bottom_right.y as u32), (89, 89));
    }

    #[test]
    fn outline_of_square_frame_stays_on_the_ring() {
        let mut buf = blank(40, 40);
        fill_rect(&mut buf, 1, 1, 2, 2); // speckle so the frame is index 1
        draw_square_frame(&mut buf, 10, 10, 20);
        let found = locate_by_contour(buf.as_view()).expect("boundary");
        for &(x, y) in &found.outline {
            let on_frame = (10..30).contains(&(x as usize))
                && (10..30).contains(&(y as usize))
                && (x == 10 || x == 29 || y == 10 || y == 29);
            assert!(on_frame, "outline left the frame at ({x}, {y})");
        }
    }
}
