use sudoku_scanner::image::GrayBuffer;

/// Side of the generated photo in pixels.
pub const PHOTO_SIZE: usize = 900;
/// First and last pixel of the grid frame.
pub const FRAME_MIN: usize = 60;
pub const FRAME_MAX: usize = 839;
/// Side of a printed digit block.
pub const DIGIT_SIZE: usize = 40;

const BACKGROUND: u8 = 220;
const INK: u8 = 30;
const LINE_THICKNESS: usize = 3;

fn fill(buf: &mut GrayBuffer, x0: usize, y0: usize, w: usize, h: usize, v: u8) {
    for y in y0..(y0 + h).min(buf.h) {
        for x in x0..(x0 + w).min(buf.w) {
            buf.set(x, y, v);
        }
    }
}

/// Top-left corner of the digit block in cell `(row, col)`.
pub fn digit_origin(row: usize, col: usize) -> (usize, usize) {
    let span = FRAME_MAX - FRAME_MIN;
    let inset = (span / 9 - DIGIT_SIZE) / 2;
    (
        FRAME_MIN + col * span / 9 + inset,
        FRAME_MIN + row * span / 9 + inset,
    )
}

/// A clean fronto-parallel "photo" of a Sudoku: light paper, dark frame and
/// lattice lines, one solid dark block per occupied cell, and a small ink
/// speckle near the origin so the frame is never the first traced contour.
pub fn sudoku_photo(occupied: &[(usize, usize)]) -> GrayBuffer {
    let mut buf = GrayBuffer::new(PHOTO_SIZE, PHOTO_SIZE);
    buf.data.fill(BACKGROUND);

    fill(&mut buf, 10, 10, 3, 3, INK);

    let span = FRAME_MAX - FRAME_MIN;
    for k in 0..=9 {
        let offset = FRAME_MIN + k * span / 9;
        fill(
            &mut buf,
            FRAME_MIN,
            offset,
            span + LINE_THICKNESS,
            LINE_THICKNESS,
            INK,
        );
        fill(
            &mut buf,
            offset,
            FRAME_MIN,
            LINE_THICKNESS,
            span + LINE_THICKNESS,
            INK,
        );
    }

    for &(row, col) in occupied {
        let (x, y) = digit_origin(row, col);
        fill(&mut buf, x, y, DIGIT_SIZE, DIGIT_SIZE, INK);
    }
    buf
}

/// Featureless paper, nothing to detect.
pub fn blank_photo() -> GrayBuffer {
    let mut buf = GrayBuffer::new(PHOTO_SIZE, PHOTO_SIZE);
    buf.data.fill(BACKGROUND);
    buf
}
