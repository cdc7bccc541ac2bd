//! The scanner driving one photo through the full pipeline.
//!
//! Every stage fully consumes its predecessor's output before the next one
//! runs; the only suspension point is the external recognizer, invoked
//! blocking and sequentially inside the row-major assembly loop. Nothing is
//! shared across scans.

use super::params::ScanParams;
use crate::binarize::{binarize_gray, to_grayscale};
use crate::blobs::{extract_blobs, Blob};
use crate::boundary::{locate_by_contour, locate_by_scan, BoundaryStrategy};
use crate::corners::resolve_corners;
use crate::diagnostics::ScanReport;
use crate::error::ScanError;
use crate::image::{GrayBuffer, GrayU8, RgbU8};
use crate::ocr::DigitRecognizer;
use crate::rectify::rectify;
use crate::tiles::{map_tiles, order_blobs_row_major, verify_blob_count, OccupancyGrid};
use crate::types::{Cell, Quadrilateral, SudokuGrid};
use log::{debug, warn};
use nalgebra::Matrix3;
use std::time::Instant;

/// Everything the geometry-and-segmentation pass produces, before any
/// recognizer is involved.
#[derive(Clone, Debug)]
pub struct GridLayout {
    /// Resolved grid corners in source-image coordinates.
    pub corners: Quadrilateral,
    /// Forward homography taking the corners onto the rectified square.
    pub homography: Matrix3<f32>,
    /// Rectified binarized grid, same size as the source image.
    pub rectified: GrayBuffer,
    /// Surviving digit blobs, ordered row-major by lattice cell.
    pub blobs: Vec<Blob>,
    /// Per-cell occupancy derived from the blob rects.
    pub occupancy: OccupancyGrid,
    pub report: ScanReport,
}

/// Final scan result handed to the caller.
#[derive(Clone, Debug)]
pub struct ScanOutcome {
    pub grid: SudokuGrid,
    /// Rectified grid image, returned beside the grid for response encoding.
    pub rectified: GrayBuffer,
    pub report: ScanReport,
}

/// Orchestrates one scan end to end. Stateless between scans; cheap to
/// construct per request or keep around.
#[derive(Clone, Debug)]
pub struct SudokuScanner {
    params: ScanParams,
}

impl SudokuScanner {
    pub fn new(params: ScanParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ScanParams {
        &self.params
    }

    /// Run binarization through tile mapping, no recognizer involved.
    pub fn detect_layout(&self, gray: GrayU8<'_>) -> Result<GridLayout, ScanError> {
        let total_start = Instant::now();
        debug!(
            "scan start w={} h={} strategy={:?}",
            gray.w, gray.h, self.params.strategy
        );

        let stage = Instant::now();
        let mask = binarize_gray(gray, &self.params.binarize);
        let binarize_ms = ms_since(stage);

        let stage = Instant::now();
        let corners = match self.params.strategy {
            BoundaryStrategy::Contour => locate_by_contour(mask.as_view())?.quad,
            BoundaryStrategy::BorderScan => {
                let bounds = locate_by_scan(mask.as_view(), &self.params.border_scan)?;
                resolve_corners(&bounds.to_segments())?
            }
        };
        let boundary_ms = ms_since(stage);

        let stage = Instant::now();
        let (rectified, homography) = rectify(mask.as_view(), &corners, mask.w, mask.h)?;
        let rectify_ms = ms_since(stage);

        let stage = Instant::now();
        let (_, blobs) = extract_blobs(rectified.as_view(), &self.params.blob);
        let blobs_ms = ms_since(stage);

        let stage = Instant::now();
        let rects: Vec<_> = blobs.iter().map(|b| b.rect).collect();
        let occupancy = map_tiles(rectified.w, rectified.h, &rects, &self.params.tile);
        verify_blob_count(&occupancy, blobs.len())?;
        let blobs = order_blobs_row_major(rectified.w, rectified.h, blobs);
        let tiles_ms = ms_since(stage);

        let report = ScanReport {
            binarize_ms,
            boundary_ms,
            rectify_ms,
            blobs_ms,
            tiles_ms,
            ocr_ms: 0.0,
            total_ms: ms_since(total_start),
            blob_count: blobs.len(),
            occupied_cells: occupancy.occupied_count(),
            recognized: 0,
            unrecognized: 0,
        };
        Ok(GridLayout {
            corners,
            homography,
            rectified,
            blobs,
            occupancy,
            report,
        })
    }

    /// Full scan: layout pass plus one recognizer call per occupied cell,
    /// row-major, sequential.
    pub fn scan(
        &self,
        gray: GrayU8<'_>,
        recognizer: &mut dyn DigitRecognizer,
    ) -> Result<ScanOutcome, ScanError> {
        let total_start = Instant::now();
        let layout = self.detect_layout(gray)?;
        let GridLayout {
            rectified,
            blobs,
            occupancy,
            mut report,
            ..
        } = layout;

        let ocr_start = Instant::now();
        let mut grid = SudokuGrid::empty();
        let mut blob_iter = blobs.into_iter();
        for (row, col, occupied) in occupancy.iter() {
            if !occupied {
                continue;
            }
            // count equality was verified during layout
            let Some(blob) = blob_iter.next() else {
                return Err(ScanError::CountMismatch {
                    occupied: report.occupied_cells,
                    blobs: report.blob_count,
                });
            };
            let cell = match recognizer.recognize(blob.image.as_view()) {
                Ok(text) => match parse_digit(&text) {
                    Some(d) => Cell::Digit(d),
                    None => {
                        warn!("cell ({row},{col}): unusable recognizer output {text:?}");
                        Cell::Unrecognized
                    }
                },
                Err(e) => {
                    warn!("cell ({row},{col}): {e}");
                    Cell::Unrecognized
                }
            };
            debug!("cell ({row},{col}) -> {cell:?}");
            grid.set(row, col, cell);
            match cell {
                Cell::Digit(_) => report.recognized += 1,
                _ => report.unrecognized += 1,
            }
        }
        report.ocr_ms = ms_since(ocr_start);
        report.total_ms = ms_since(total_start);

        Ok(ScanOutcome {
            grid,
            rectified,
            report,
        })
    }

    /// Convenience entry point for color input.
    pub fn scan_rgb(
        &self,
        rgb: RgbU8<'_>,
        recognizer: &mut dyn DigitRecognizer,
    ) -> Result<ScanOutcome, ScanError> {
        let gray = to_grayscale(rgb);
        self.scan(gray.as_view(), recognizer)
    }
}

#[inline]
fn ms_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Interpret recognizer text as one printed digit. Multi-character artifacts
/// are repeatedly divided by 10 until a single digit remains; zero and
/// non-numeric output have no Sudoku reading and map to `None`.
fn parse_digit(text: &str) -> Option<u8> {
    let mut n: u32 = text.trim().parse().ok()?;
    while n > 9 {
        n /= 10;
    }
    (n > 0).then_some(n as u8)
}
