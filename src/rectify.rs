//! Perspective rectification of the located grid.
//!
//! The unique 3×3 projective transform mapping the four detected corners to
//! the output square is solved as an 8×8 linear system (h33 fixed at 1);
//! destination pixels are then resampled through the inverse mapping with
//! bilinear interpolation. Nothing here checks that the quad is simple: a
//! degenerate or reordered quad warps to garbage pixels, not a panic.

use crate::error::ScanError;
use crate::image::{GrayBuffer, GrayU8};
use crate::types::{Point, Quadrilateral};
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

const W_EPS: f32 = 1e-9;

/// Projective transform taking `src` corners onto `dst` corners, or `None`
/// when the correspondences admit no unique solution.
pub fn homography_from_quad(src: &Quadrilateral, dst: &Quadrilateral) -> Option<Matrix3<f32>> {
    let pairs = [
        (src.top_left, dst.top_left),
        (src.top_right, dst.top_right),
        (src.bottom_left, dst.bottom_left),
        (src.bottom_right, dst.bottom_right),
    ];

    let mut a = SMatrix::<f32, 8, 8>::zeros();
    let mut b = SVector::<f32, 8>::zeros();
    for (i, (s, d)) in pairs.iter().enumerate() {
        let r = i * 2;
        a[(r, 0)] = s.x;
        a[(r, 1)] = s.y;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -d.x * s.x;
        a[(r, 7)] = -d.x * s.y;
        b[r] = d.x;

        a[(r + 1, 3)] = s.x;
        a[(r + 1, 4)] = s.y;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -d.y * s.x;
        a[(r + 1, 7)] = -d.y * s.y;
        b[r + 1] = d.y;
    }

    let h = a.lu().solve(&b)?;
    if h.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(Matrix3::new(
        h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0,
    ))
}

/// Apply a homography to one point. `None` when the projected weight is
/// vanishing or non-finite.
pub fn apply_homography(h: &Matrix3<f32>, p: Point) -> Option<Point> {
    let v = h * Vector3::new(p.x, p.y, 1.0);
    let w = v[2];
    if !w.is_finite() || w.abs() <= W_EPS || !v[0].is_finite() || !v[1].is_finite() {
        return None;
    }
    Some(Point::new(v[0] / w, v[1] / w))
}

#[inline]
fn sample_bilinear(src: GrayU8<'_>, x: f32, y: f32) -> u8 {
    if x < 0.0 || y < 0.0 {
        return 0;
    }
    let max_x = (src.w - 1) as f32;
    let max_y = (src.h - 1) as f32;
    if x > max_x || y > max_y {
        return 0;
    }
    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(src.w - 1);
    let y1 = (y0 + 1).min(src.h - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = src.get(x0, y0) as f32;
    let p10 = src.get(x1, y0) as f32;
    let p01 = src.get(x0, y1) as f32;
    let p11 = src.get(x1, y1) as f32;

    let top = p00 + (p10 - p00) * fx;
    let bot = p01 + (p11 - p01) * fx;
    (top + (bot - top) * fy).round().clamp(0.0, 255.0) as u8
}

/// Warp `src` so that `quad` lands on the corners of an `out_w`×`out_h`
/// output. Returns the rectified image and the forward homography.
pub fn rectify(
    src: GrayU8<'_>,
    quad: &Quadrilateral,
    out_w: usize,
    out_h: usize,
) -> Result<(GrayBuffer, Matrix3<f32>), ScanError> {
    let dst = Quadrilateral::from_extent(0.0, 0.0, out_w as f32, out_h as f32);
    let forward = homography_from_quad(quad, &dst).ok_or(ScanError::DegenerateQuad)?;
    let inverse = forward.try_inverse().ok_or(ScanError::DegenerateQuad)?;

    let mut out = GrayBuffer::new(out_w, out_h);
    for y in 0..out_h {
        let row = &mut out.data[y * out_w..(y + 1) * out_w];
        for (x, dst_px) in row.iter_mut().enumerate() {
            let mapped = apply_homography(&inverse, Point::new(x as f32, y as f32));
            *dst_px = match mapped {
                Some(p) => sample_bilinear(src, p.x, p.y),
                None => 0,
            };
        }
    }
    Ok((out, forward))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayBuffer;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn gradient_image(w: usize, h: usize) -> GrayBuffer {
        let mut buf = GrayBuffer::new(w, h);
        for y in 0..h {
            for x in 0..w {
                buf.set(x, y, ((x * 7 + y * 13) % 251) as u8);
            }
        }
        buf
    }

    #[test]
    fn full_frame_quad_is_an_identity_warp() {
        let img = gradient_image(64, 64);
        let quad = Quadrilateral::from_extent(0.0, 0.0, 64.0, 64.0);
        let (out, h) = rectify(img.as_view(), &quad, 64, 64).expect("rectify");
        assert_eq!(out.w, 64);
        assert_eq!(out.h, 64);
        for (r, c) in [(0, 0), (1, 1), (2, 2)] {
            assert!(approx_eq(h[(r, c)], 1.0), "H not identity: {h}");
        }
        assert_eq!(out.data, img.data);
    }

    #[test]
    fn homography_sends_corners_to_template_corners() {
        let quad = Quadrilateral {
            top_left: Point::new(12.0, 9.0),
            top_right: Point::new(101.0, 15.0),
            bottom_left: Point::new(8.0, 97.0),
            bottom_right: Point::new(110.0, 104.0),
        };
        let dst = Quadrilateral::from_extent(0.0, 0.0, 90.0, 90.0);
        let h = homography_from_quad(&quad, &dst).expect("homography");

        for (s, d) in [
            (quad.top_left, dst.top_left),
            (quad.top_right, dst.top_right),
            (quad.bottom_left, dst.bottom_left),
            (quad.bottom_right, dst.bottom_right),
        ] {
            let p = apply_homography(&h, s).expect("finite");
            assert!(
                approx_eq(p.x, d.x) && approx_eq(p.y, d.y),
                "{s:?} mapped to {p:?}, wanted {d:?}"
            );
        }
    }

    #[test]
    fn output_matches_requested_template_size() {
        let img = gradient_image(120, 80);
        let quad = Quadrilateral::from_extent(10.0, 10.0, 100.0, 70.0);
        let (out, _) = rectify(img.as_view(), &quad, 120, 80).expect("rectify");
        assert_eq!((out.w, out.h), (120, 80));
    }

    #[test]
    fn reordered_corners_degrade_without_panicking() {
        let img = gradient_image(64, 64);
        // bottom corners swapped: self-intersecting polygon
        let quad = Quadrilateral {
            top_left: Point::new(0.0, 0.0),
            top_right: Point::new(64.0, 0.0),
            bottom_left: Point::new(64.0, 64.0),
            bottom_right: Point::new(0.0, 64.0),
        };
        if let Ok((out, _)) = rectify(img.as_view(), &quad, 64, 64) {
            assert_eq!((out.w, out.h), (64, 64));
        }
    }

    #[test]
    fn collinear_corners_do_not_produce_nonfinite_output() {
        let img = gradient_image(32, 32);
        let quad = Quadrilateral {
            top_left: Point::new(0.0, 0.0),
            top_right: Point::new(10.0, 10.0),
            bottom_left: Point::new(20.0, 20.0),
            bottom_right: Point::new(30.0, 30.0),
        };
        match rectify(img.as_view(), &quad, 32, 32) {
            Ok((out, _)) => assert_eq!((out.w, out.h), (32, 32)),
            Err(e) => assert_eq!(e, ScanError::DegenerateQuad),
        }
    }
}
