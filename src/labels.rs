//! Connected-component labeling over a binary mask.
//!
//! Shared by the contour locator (outline tracing per component) and the blob
//! extractor (bounding rects). Seeds are visited in raster order and grown
//! with an explicit stack over the 8-neighborhood, so component indices are
//! deterministic: component 0 is the first foreground region a row-major
//! scan encounters.

use crate::image::GrayU8;

const NEIGH_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Per-component statistics gathered during the labeling pass.
#[derive(Clone, Copy, Debug)]
pub struct Component {
    /// First pixel encountered in raster order; the outline trace starts here.
    pub seed: (u32, u32),
    /// Number of foreground pixels in the component.
    pub area_px: u32,
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

/// Label map plus per-component stats. Label 0 is background; component `i`
/// carries label `i + 1`.
#[derive(Clone, Debug)]
pub struct ComponentMap {
    pub w: usize,
    pub h: usize,
    pub labels: Vec<u32>,
    pub components: Vec<Component>,
}

impl ComponentMap {
    #[inline]
    pub fn label_at(&self, x: usize, y: usize) -> u32 {
        self.labels[y * self.w + x]
    }
}

/// Label all 8-connected foreground (non-zero) components of `mask`.
pub fn label_components(mask: GrayU8<'_>) -> ComponentMap {
    let (w, h) = (mask.w, mask.h);
    let mut labels = vec![0u32; w * h];
    let mut components: Vec<Component> = Vec::new();
    let mut stack: Vec<usize> = Vec::with_capacity(64);

    for seed_idx in 0..w * h {
        let sx = seed_idx % w;
        let sy = seed_idx / w;
        if labels[seed_idx] != 0 || mask.get(sx, sy) == 0 {
            continue;
        }

        let label = components.len() as u32 + 1;
        let mut comp = Component {
            seed: (sx as u32, sy as u32),
            area_px: 0,
            min_x: sx as u32,
            min_y: sy as u32,
            max_x: sx as u32,
            max_y: sy as u32,
        };

        labels[seed_idx] = label;
        stack.clear();
        stack.push(seed_idx);

        while let Some(idx) = stack.pop() {
            let x = idx % w;
            let y = idx / w;
            comp.area_px += 1;
            comp.min_x = comp.min_x.min(x as u32);
            comp.min_y = comp.min_y.min(y as u32);
            comp.max_x = comp.max_x.max(x as u32);
            comp.max_y = comp.max_y.max(y as u32);

            for (dx, dy) in NEIGH_OFFSETS {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let nidx = ny as usize * w + nx as usize;
                if labels[nidx] != 0 || mask.get(nx as usize, ny as usize) == 0 {
                    continue;
                }
                labels[nidx] = label;
                stack.push(nidx);
            }
        }

        components.push(comp);
    }

    ComponentMap {
        w,
        h,
        labels,
        components,
    }
}
