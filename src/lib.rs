#![doc = include_str!("../README.md")]

pub mod binarize;
pub mod blobs;
pub mod boundary;
pub mod config;
pub mod corners;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod labels;
pub mod ocr;
pub mod rectify;
pub mod scanner;
pub mod tiles;
pub mod types;

// --- High-level re-exports -------------------------------------------------

pub use crate::diagnostics::ScanReport;
pub use crate::error::ScanError;
pub use crate::ocr::{DigitRecognizer, OcrError};
pub use crate::scanner::{GridLayout, ScanOutcome, ScanParams, SudokuScanner};
pub use crate::types::{Cell, SudokuGrid};

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::image::{GrayU8, RgbU8};
    pub use crate::{
        Cell, DigitRecognizer, OcrError, ScanParams, SudokuGrid, SudokuScanner,
    };
}
