//! Digit recognition capability boundary.
//!
//! The scanner never depends on a concrete engine: it borrows a
//! [`DigitRecognizer`] for the duration of one scan and calls it once per
//! occupied cell, sequentially, in row-major cell order. Engine setup and
//! teardown belong to the implementor; holding the `&mut` borrow across the
//! batch is the whole lifecycle the pipeline needs.

use crate::image::GrayU8;
use thiserror::Error;

/// One glyph could not be read. Recoverable: the cell is reported as
/// unrecognized and the scan continues.
#[derive(Debug, Clone, Error)]
#[error("recognizer failed: {message}")]
pub struct OcrError {
    pub message: String,
}

impl OcrError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// External recognition engine seen through a single capability.
pub trait DigitRecognizer {
    /// Read one cropped single-glyph image and return its text, expected to
    /// be a base-10 digit string.
    fn recognize(&mut self, glyph: GrayU8<'_>) -> Result<String, OcrError>;
}
