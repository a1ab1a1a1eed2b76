use serde::{Deserialize, Serialize};

/// Parameters of the grid finder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderParams {
    /// Side of one rectified cell in pixels. The rectified grid is `9 * cell_size` square.
    pub cell_size: usize,
    /// Radius of the box blur applied before edge detection (`1` = 3x3).
    pub blur_radius: u32,
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Chebyshev radius used to close small gaps in the edge map. `0` disables it.
    pub edge_dilation: u8,
    /// Minimal enclosed area (px²) of the outer contour.
    pub min_contour_area: f64,
}

impl Default for FinderParams {
    fn default() -> Self {
        Self {
            cell_size: 40,
            blur_radius: 1,
            canny_low: 40.0,
            canny_high: 80.0,
            edge_dilation: 1,
            min_contour_area: 1000.0,
        }
    }
}

impl FinderParams {
    /// Side of the rectified puzzle image.
    pub fn rectification_size(&self) -> usize {
        self.cell_size * sudoku_lens_core::GRID_SIZE
    }
}
