//! Per-scan timing and count diagnostics.

use serde::Serialize;

/// Stage timings in milliseconds plus headline counts for one scan.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub binarize_ms: f64,
    pub boundary_ms: f64,
    pub rectify_ms: f64,
    pub blobs_ms: f64,
    pub tiles_ms: f64,
    pub ocr_ms: f64,
    pub total_ms: f64,
    pub blob_count: usize,
    pub occupied_cells: usize,
    pub recognized: usize,
    pub unrecognized: usize,
}
