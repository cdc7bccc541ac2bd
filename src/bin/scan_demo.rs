use serde::Serialize;
use std::env;
use std::path::Path;
use sudoku_scanner::config::scan::load_config;
use sudoku_scanner::diagnostics::ScanReport;
use sudoku_scanner::image::io::{load_grayscale_image, save_grayscale_png, write_json_file};
use sudoku_scanner::image::GrayBuffer;
use sudoku_scanner::scanner::GridLayout;
use sudoku_scanner::types::BoundingRect;
use sudoku_scanner::SudokuScanner;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let gray = load_grayscale_image(&config.input_path)?;
    let scanner = SudokuScanner::new(config.scan.clone());
    let layout = scanner
        .detect_layout(gray.as_view())
        .map_err(|e| format!("Scan failed: {e}"))?;

    print_summary(&layout);

    if let Some(path) = &config.output.rectified_image {
        save_grayscale_png(&layout.rectified, path)?;
        println!("Rectified grid written to {}", path.display());
    }
    if let Some(path) = &config.output.blob_overlay {
        let overlay = draw_rect_overlay(&layout);
        save_grayscale_png(&overlay, path)?;
        println!("Blob overlay written to {}", path.display());
    }
    if let Some(path) = &config.output.json_out {
        let summary = LayoutSummary::from_layout(&layout);
        write_json_file(path, &summary)?;
        println!("JSON report written to {}", path.display());
    }

    Ok(())
}

fn usage() -> String {
    "Usage: scan_demo <config.json>".to_string()
}

fn print_summary(layout: &GridLayout) {
    println!("Layout summary");
    println!("  blobs: {}", layout.blobs.len());
    println!("  occupied cells: {}", layout.occupancy.occupied_count());
    let c = &layout.corners;
    println!(
        "  corners: tl=({:.1},{:.1}) tr=({:.1},{:.1}) bl=({:.1},{:.1}) br=({:.1},{:.1})",
        c.top_left.x,
        c.top_left.y,
        c.top_right.x,
        c.top_right.y,
        c.bottom_left.x,
        c.bottom_left.y,
        c.bottom_right.x,
        c.bottom_right.y
    );

    println!("\nOccupancy (row-major):");
    for row in 0..9 {
        print!("  ");
        for col in 0..9 {
            print!(
                "{} ",
                if layout.occupancy.occupied(row, col) {
                    '#'
                } else {
                    '.'
                }
            );
        }
        println!();
    }

    let r = &layout.report;
    println!(
        "\nTimings (ms): binarize={:.3} boundary={:.3} rectify={:.3} blobs={:.3} tiles={:.3} total={:.3}",
        r.binarize_ms, r.boundary_ms, r.rectify_ms, r.blobs_ms, r.tiles_ms, r.total_ms
    );
}

/// The rectified grid with every blob rect outlined in mid-gray.
fn draw_rect_overlay(layout: &GridLayout) -> GrayBuffer {
    let mut out = layout.rectified.clone();
    for blob in &layout.blobs {
        let r = blob.rect;
        let x1 = (r.right() as usize).min(out.w).saturating_sub(1);
        let y1 = (r.bottom() as usize).min(out.h).saturating_sub(1);
        for x in r.x as usize..=x1 {
            out.set(x, r.y as usize, 128);
            out.set(x, y1, 128);
        }
        for y in r.y as usize..=y1 {
            out.set(r.x as usize, y, 128);
            out.set(x1, y, 128);
        }
    }
    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutSummary {
    width: usize,
    height: usize,
    occupied_cells: usize,
    blob_rects: Vec<BoundingRect>,
    occupancy: Vec<Vec<bool>>,
    report: ScanReport,
}

impl LayoutSummary {
    fn from_layout(layout: &GridLayout) -> Self {
        let occupancy = (0..9)
            .map(|r| (0..9).map(|c| layout.occupancy.occupied(r, c)).collect())
            .collect();
        Self {
            width: layout.rectified.w,
            height: layout.rectified.h,
            occupied_cells: layout.occupancy.occupied_count(),
            blob_rects: layout.blobs.iter().map(|b| b.rect).collect(),
            occupancy,
            report: layout.report.clone(),
        }
    }
}
