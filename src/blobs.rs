//! Digit blob extraction from the rectified grid.
//!
//! A cross-kernel dilation first merges fragmented digit strokes into single
//! connected regions, a fixed re-threshold normalizes the dilation artifacts,
//! then connected components yield one bounding rect and one cropped
//! sub-image per candidate digit. Components below the speckle thresholds
//! are dropped. Rects and crops stay index-aligned; downstream mapping
//! relies on that pairing.

use crate::image::{GrayBuffer, GrayU8, ImageView, ImageViewMut};
use crate::labels::label_components;
use crate::types::BoundingRect;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobParams {
    /// Side of the cross-shaped dilation kernel.
    pub dilate_size: usize,
    /// Fixed re-threshold cutoff applied after dilation.
    pub threshold: u8,
    /// Minimum component pixel count to survive speckle filtering.
    pub min_area: u32,
    /// Minimum bounding-rect side length.
    pub min_extent: u32,
    /// Maximum bounding-rect side as a fraction of the grid dimension.
    /// Components wider or taller than this are grid structure (the frame
    /// and lattice lines land in the rectified image too), not digits.
    pub max_extent_frac: f32,
}

impl Default for BlobParams {
    fn default() -> Self {
        Self {
            dilate_size: 4,
            threshold: 128,
            min_area: 15,
            min_extent: 2,
            max_extent_frac: 0.5,
        }
    }
}

/// One extracted digit candidate: its rect in rectified-grid coordinates and
/// the cropped sub-image handed to recognition.
#[derive(Clone, Debug)]
pub struct Blob {
    pub rect: BoundingRect,
    pub image: GrayBuffer,
}

/// Grayscale dilation with a cross-shaped structuring element of side `size`
/// anchored at its centre.
pub fn dilate_cross(src: GrayU8<'_>, size: usize) -> GrayBuffer {
    let (w, h) = (src.w, src.h);
    let mut out = GrayBuffer::new(w, h);
    if size <= 1 {
        for y in 0..h {
            out.data[y * w..(y + 1) * w].copy_from_slice(src.row(y));
        }
        return out;
    }
    let anchor = (size / 2) as isize;
    let span = size as isize;
    for y in 0..h {
        let dst = out.row_mut(y);
        for x in 0..w {
            let mut best = 0u8;
            for k in 0..span {
                let sx = x as isize + k - anchor;
                if sx >= 0 && sx < w as isize {
                    best = best.max(src.get(sx as usize, y));
                }
                let sy = y as isize + k - anchor;
                if sy >= 0 && sy < h as isize {
                    best = best.max(src.get(x, sy as usize));
                }
            }
            dst[x] = best;
        }
    }
    out
}

/// Fixed binary threshold: 255 where `v > cutoff`, else 0.
pub fn threshold_binary(src: GrayU8<'_>, cutoff: u8) -> GrayBuffer {
    let mut out = GrayBuffer::new(src.w, src.h);
    for y in 0..src.h {
        let row = src.row(y);
        for (d, &s) in out.row_mut(y).iter_mut().zip(row) {
            *d = if s > cutoff { 255 } else { 0 };
        }
    }
    out
}

fn crop(src: &GrayBuffer, rect: &BoundingRect) -> GrayBuffer {
    let mut out = GrayBuffer::new(rect.w as usize, rect.h as usize);
    for y in 0..rect.h as usize {
        let sy = rect.y as usize + y;
        let start = sy * src.w + rect.x as usize;
        out.data[y * rect.w as usize..(y + 1) * rect.w as usize]
            .copy_from_slice(&src.data[start..start + rect.w as usize]);
    }
    out
}

/// Dilate, re-threshold, label and crop. Returns the processed mask and the
/// surviving blobs in raster discovery order.
pub fn extract_blobs(rectified: GrayU8<'_>, params: &BlobParams) -> (GrayBuffer, Vec<Blob>) {
    let dilated = dilate_cross(rectified, params.dilate_size);
    let processed = threshold_binary(dilated.as_view(), params.threshold);

    let map = label_components(processed.as_view());
    let max_w = (rectified.w as f32 * params.max_extent_frac) as u32;
    let max_h = (rectified.h as f32 * params.max_extent_frac) as u32;
    let mut blobs = Vec::new();
    let mut dropped = 0usize;
    for comp in &map.components {
        let rect = BoundingRect {
            x: comp.min_x,
            y: comp.min_y,
            w: comp.max_x - comp.min_x + 1,
            h: comp.max_y - comp.min_y + 1,
        };
        if comp.area_px < params.min_area
            || rect.w < params.min_extent
            || rect.h < params.min_extent
            || rect.w > max_w
            || rect.h > max_h
        {
            dropped += 1;
            continue;
        }
        let image = crop(&processed, &rect);
        blobs.push(Blob { rect, image });
    }
    debug!(
        "blobs: {} kept, {} dropped as speckle",
        blobs.len(),
        dropped
    );
    (processed, blobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(w: usize, h: usize) -> GrayBuffer {
        GrayBuffer::new(w, h)
    }

    fn fill_rect(buf: &mut GrayBuffer, x0: usize, y0: usize, w: usize, h: usize) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                buf.set(x, y, 255);
            }
        }
    }

    #[test]
    fn dilation_merges_fragmented_strokes() {
        let mut buf = blank(40, 40);
        // two stroke fragments 2 px apart
        fill_rect(&mut buf, 10, 10, 4, 10);
        fill_rect(&mut buf, 16, 10, 4, 10);
        let (_, blobs) = extract_blobs(buf.as_view(), &BlobParams::default());
        assert_eq!(blobs.len(), 1, "fragments should fuse into one blob");
        let r = blobs[0].rect;
        assert!(r.x <= 10 && r.right() >= 20);
    }

    #[test]
    fn speckle_is_dropped() {
        let mut buf = blank(60, 60);
        fill_rect(&mut buf, 10, 10, 12, 12);
        buf.set(50, 50, 255); // lone pixel
        let params = BlobParams {
            dilate_size: 1,
            ..Default::default()
        };
        let (_, blobs) = extract_blobs(buf.as_view(), &params);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].rect.area(), 12 * 12);
    }

    #[test]
    fn crops_match_their_rects() {
        let mut buf = blank(50, 50);
        fill_rect(&mut buf, 20, 5, 8, 14);
        let params = BlobParams {
            dilate_size: 1,
            ..Default::default()
        };
        let (_, blobs) = extract_blobs(buf.as_view(), &params);
        assert_eq!(blobs.len(), 1);
        let blob = &blobs[0];
        assert_eq!(blob.image.w, blob.rect.w as usize);
        assert_eq!(blob.image.h, blob.rect.h as usize);
        assert!(blob.image.data.iter().all(|&v| v == 0 || v == 255));
        assert_eq!(blob.image.get(4, 7), 255);
    }

    #[test]
    fn discovery_order_is_raster() {
        let mut buf = blank(80, 80);
        fill_rect(&mut buf, 50, 10, 10, 10);
        fill_rect(&mut buf, 10, 40, 10, 10);
        let params = BlobParams {
            dilate_size: 1,
            ..Default::default()
        };
        let (_, blobs) = extract_blobs(buf.as_view(), &params);
        assert_eq!(blobs.len(), 2);
        assert!(blobs[0].rect.y < blobs[1].rect.y);
    }

    #[test]
    fn grid_scale_structure_is_dropped() {
        let mut buf = blank(90, 90);
        // frame ring spanning the whole image, plus one digit-sized blob
        for i in 0..90 {
            buf.set(i, 0, 255);
            buf.set(i, 89, 255);
            buf.set(0, i, 255);
            buf.set(89, i, 255);
        }
        fill_rect(&mut buf, 40, 40, 10, 10);
        let params = BlobParams {
            dilate_size: 1,
            ..Default::default()
        };
        let (_, blobs) = extract_blobs(buf.as_view(), &params);
        assert_eq!(blobs.len(), 1, "frame should be filtered as structure");
        assert_eq!(blobs[0].rect.area(), 100);
    }
}
