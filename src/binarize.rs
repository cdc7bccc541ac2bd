//! Foreground mask extraction from a raw photo.
//!
//! Four fixed steps: grayscale conversion, a 3×3 normalized box blur to
//! suppress sensor noise, an adaptive threshold against the local mean, and a
//! polarity inversion so ink and grid lines end up as the white (255) class.
//! Infallible; the mask always matches the input dimensions.

use crate::image::{GrayBuffer, GrayU8, ImageView, ImageViewMut, RgbU8};
use serde::{Deserialize, Serialize};

/// Knobs for the adaptive threshold stage.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarizeParams {
    /// Side of the square local-mean window, in pixels. Must be odd.
    pub window: usize,
    /// Constant subtracted from the local mean before comparison.
    pub offset: i32,
}

impl Default for BinarizeParams {
    fn default() -> Self {
        Self {
            window: 11,
            offset: 2,
        }
    }
}

/// BT.601 luma conversion, integer arithmetic.
pub fn to_grayscale(src: RgbU8<'_>) -> GrayBuffer {
    let mut out = GrayBuffer::new(src.w, src.h);
    for y in 0..src.h {
        let row = src.row(y);
        let dst = out.row_mut(y);
        for x in 0..src.w {
            let r = row[x * 3] as u32;
            let g = row[x * 3 + 1] as u32;
            let b = row[x * 3 + 2] as u32;
            dst[x] = ((r * 77 + g * 150 + b * 29) >> 8) as u8;
        }
    }
    out
}

/// 3×3 normalized box blur with clamped borders.
pub fn box_blur_3x3(src: GrayU8<'_>) -> GrayBuffer {
    let (w, h) = (src.w, src.h);
    let mut out = GrayBuffer::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }
    for y in 0..h {
        let rows = [
            src.row(y.saturating_sub(1)),
            src.row(y),
            src.row((y + 1).min(h - 1)),
        ];
        let dst = out.row_mut(y);
        for x in 0..w {
            let xs = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            let mut sum = 0u32;
            for row in rows {
                sum += row[xs[0]] as u32 + row[xs[1]] as u32 + row[xs[2]] as u32;
            }
            dst[x] = ((sum + 4) / 9) as u8;
        }
    }
    out
}

/// Classify each pixel against the mean of its clamped `window`×`window`
/// neighborhood: 255 where `px > mean - offset`, else 0.
///
/// The window sum comes from an integral image, so the pass is O(W·H)
/// regardless of window size. The comparison is done on cross-multiplied
/// integers to avoid rounding the mean.
pub fn adaptive_threshold(src: GrayU8<'_>, window: usize, offset: i32) -> GrayBuffer {
    let (w, h) = (src.w, src.h);
    let mut out = GrayBuffer::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }

    // integral[y][x] = sum of src[0..y, 0..x], one extra row/column of zeros
    let iw = w + 1;
    let mut integral = vec![0u64; iw * (h + 1)];
    for y in 0..h {
        let row = src.row(y);
        let mut run = 0u64;
        for x in 0..w {
            run += row[x] as u64;
            integral[(y + 1) * iw + (x + 1)] = integral[y * iw + (x + 1)] + run;
        }
    }

    let radius = (window / 2) as isize;
    for y in 0..h {
        let y0 = (y as isize - radius).max(0) as usize;
        let y1 = ((y as isize + radius) as usize).min(h - 1) + 1;
        let row = src.row(y);
        let dst = out.row_mut(y);
        for x in 0..w {
            let x0 = (x as isize - radius).max(0) as usize;
            let x1 = ((x as isize + radius) as usize).min(w - 1) + 1;
            let sum = integral[y1 * iw + x1] + integral[y0 * iw + x0]
                - integral[y0 * iw + x1]
                - integral[y1 * iw + x0];
            let count = ((y1 - y0) * (x1 - x0)) as i64;
            // px > sum/count - offset, without dividing
            let lhs = row[x] as i64 * count;
            let rhs = sum as i64 - offset as i64 * count;
            dst[x] = if lhs > rhs { 255 } else { 0 };
        }
    }
    out
}

/// Flip every pixel: `v -> 255 - v`.
pub fn invert(mask: &mut GrayBuffer) {
    for v in &mut mask.data {
        *v = 255 - *v;
    }
}

/// Full binarization chain on a grayscale view.
pub fn binarize_gray(src: GrayU8<'_>, params: &BinarizeParams) -> GrayBuffer {
    let blurred = box_blur_3x3(src);
    let mut mask = adaptive_threshold(blurred.as_view(), params.window, params.offset);
    invert(&mut mask);
    mask
}

/// Full binarization chain on an RGB view.
pub fn binarize_rgb(src: RgbU8<'_>, params: &BinarizeParams) -> GrayBuffer {
    let gray = to_grayscale(src);
    binarize_gray(gray.as_view(), params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_view(buf: &GrayBuffer) -> GrayU8<'_> {
        buf.as_view()
    }

    /// Dark square on a light background, the shape of printed ink.
    fn ink_patch(w: usize, h: usize) -> GrayBuffer {
        let mut img = GrayBuffer::new(w, h);
        img.data.fill(220);
        for y in h / 4..h / 2 {
            for x in w / 4..w / 2 {
                img.set(x, y, 20);
            }
        }
        img
    }

    #[test]
    fn output_is_strictly_binary_and_same_size() {
        let img = ink_patch(40, 32);
        let mask = binarize_gray(gray_view(&img), &BinarizeParams::default());
        assert_eq!(mask.w, 40);
        assert_eq!(mask.h, 32);
        assert!(mask.data.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn flat_input_has_no_foreground() {
        let mut img = GrayBuffer::new(30, 30);
        img.data.fill(128);
        let mask = binarize_gray(gray_view(&img), &BinarizeParams::default());
        assert!(mask.data.iter().all(|&v| v == 0));
    }

    #[test]
    fn ink_becomes_foreground() {
        let img = ink_patch(48, 48);
        let mask = binarize_gray(gray_view(&img), &BinarizeParams::default());
        // centre of the dark patch must be white after inversion
        assert_eq!(mask.get(16, 16), 255);
        // far background stays black
        assert_eq!(mask.get(44, 44), 0);
    }

    #[test]
    fn rebinarize_stays_within_threshold_band() {
        let params = BinarizeParams::default();
        let img = ink_patch(48, 48);
        let first = binarize_gray(gray_view(&img), &params);
        let second = binarize_gray(gray_view(&first), &params);

        assert!(second.data.iter().all(|&v| v == 0 || v == 255));

        // A pixel can only flip to foreground if its threshold window saw
        // first-pass foreground: blur radius 1 + window radius 5.
        let reach = (params.window / 2 + 1) as isize;
        for y in 0..second.h {
            for x in 0..second.w {
                if second.get(x, y) != 255 {
                    continue;
                }
                let mut near_first = false;
                'outer: for dy in -reach..=reach {
                    for dx in -reach..=reach {
                        let nx = x as isize + dx;
                        let ny = y as isize + dy;
                        if nx < 0 || ny < 0 || nx >= first.w as isize || ny >= first.h as isize {
                            continue;
                        }
                        if first.get(nx as usize, ny as usize) == 255 {
                            near_first = true;
                            break 'outer;
                        }
                    }
                }
                assert!(
                    near_first,
                    "foreground escaped the threshold band at ({x}, {y})"
                );
            }
        }
    }
}
