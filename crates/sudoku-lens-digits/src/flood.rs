//! Seeded 8-connected flood extraction over a binary mask.

use sudoku_lens_core::GrayImage;

/// Axis-aligned pixel rectangle, `[x, x + width) x [y, y + height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedRegion {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl SeedRegion {
    /// Seed window of a cell: a quarter-size square starting at the cell centre.
    ///
    /// Keeps seeds away from the grid lines on the cell border.
    pub fn for_cell(width: usize, height: usize) -> Self {
        Self {
            x: width / 2,
            y: height / 2,
            width: width / 4,
            height: height / 4,
        }
    }
}

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Keep only the foreground components of `binary` that touch `seed`.
///
/// Uses an explicit worklist; each pixel is pushed at most once.
pub fn flood_extract(binary: &GrayImage, seed: SeedRegion) -> GrayImage {
    let (w, h) = (binary.width, binary.height);
    let mut out = GrayImage::new(w, h);
    let mut visited = vec![false; w * h];
    let mut stack: Vec<(usize, usize)> = Vec::new();

    let x_end = (seed.x + seed.width).min(w);
    let y_end = (seed.y + seed.height).min(h);

    for sy in seed.y.min(h)..y_end {
        for sx in seed.x.min(w)..x_end {
            let idx = sy * w + sx;
            if visited[idx] || binary.data[idx] == 0 {
                continue;
            }
            visited[idx] = true;
            stack.push((sx, sy));

            while let Some((x, y)) = stack.pop() {
                out.set(x, y, 255);
                for (dx, dy) in NEIGHBOURS {
                    let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                    else {
                        continue;
                    };
                    if nx >= w || ny >= h {
                        continue;
                    }
                    let n = ny * w + nx;
                    if !visited[n] && binary.data[n] != 0 {
                        visited[n] = true;
                        stack.push((nx, ny));
                    }
                }
            }
        }
    }
    out
}
