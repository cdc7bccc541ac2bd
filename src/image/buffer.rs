//! Owned raster buffers in row-major layout (stride == width).
//!
//! Every pipeline stage that produces an image returns one of these; borrowed
//! [`GrayU8`]/[`RgbU8`] views are taken where a stage only reads.

use super::u8::{GrayU8, RgbU8};

/// Owned single-channel 8-bit buffer.
#[derive(Clone, Debug)]
pub struct GrayBuffer {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Backing storage in row-major order
    pub data: Vec<u8>,
}

impl GrayBuffer {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0u8; w * h],
        }
    }

    /// Wrap raw bytes; `data.len()` must be `w * h`.
    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), w * h);
        Self { w, h, data }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Borrow as a read-only view.
    pub fn as_view(&self) -> GrayU8<'_> {
        GrayU8 {
            w: self.w,
            h: self.h,
            stride: self.w,
            data: &self.data,
        }
    }
}

impl crate::image::traits::ImageView for GrayBuffer {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.w
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        Some(&self.data)
    }
}

impl crate::image::traits::ImageViewMut for GrayBuffer {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.w;
        &mut self.data[start..start + self.w]
    }
    #[inline]
    fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        Some(&mut self.data)
    }
}

/// Owned interleaved RGB buffer, three bytes per pixel.
#[derive(Clone, Debug)]
pub struct RgbBuffer {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl RgbBuffer {
    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), w * h * 3);
        Self { w, h, data }
    }

    pub fn as_view(&self) -> RgbU8<'_> {
        RgbU8 {
            w: self.w,
            h: self.h,
            stride: self.w,
            data: &self.data,
        }
    }
}
