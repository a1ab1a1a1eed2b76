//! Analytic puzzle renderer shared by the finder and pipeline tests.
#![allow(dead_code)]

use image::{GrayImage, Luma};
use nalgebra::Point2;
use sudoku_lens_core::{homography_from_4pt, Homography};

pub const CELL: f32 = 40.0;
pub const SIDE: f32 = CELL * 9.0;

/// Photographed-looking puzzle: white paper, heavy outer frame, thin cell
/// lines and a vertical bar in every cell listed in `inked`.
pub struct SyntheticPuzzle {
    pub corners: [Point2<f32>; 4],
    pub inked: Vec<(usize, usize)>,
}

impl SyntheticPuzzle {
    pub fn render(&self, width: u32, height: u32) -> GrayImage {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(SIDE, 0.0),
            Point2::new(SIDE, SIDE),
            Point2::new(0.0, SIDE),
        ];
        let h_img_from_rect = homography_from_4pt(&square, &self.corners).expect("homography");
        let h_rect_from_img: Homography = h_img_from_rect.inverse().expect("invertible");

        GrayImage::from_fn(width, height, |x, y| {
            let p = h_rect_from_img.apply(Point2::new(x as f32 + 0.5, y as f32 + 0.5));
            Luma([self.shade(p.x, p.y)])
        })
    }

    fn shade(&self, u: f32, v: f32) -> u8 {
        if !(0.0..SIDE).contains(&u) || !(0.0..SIDE).contains(&v) {
            return 255;
        }
        if u < 8.0 || v < 8.0 || u > SIDE - 8.0 || v > SIDE - 8.0 {
            return 0;
        }
        let (lu, lv) = (u % CELL, v % CELL);
        if lu < 1.5 || lu > CELL - 1.5 || lv < 1.5 || lv > CELL - 1.5 {
            return 0;
        }
        let cell = ((v / CELL) as usize, (u / CELL) as usize);
        let bar = (0.4 * CELL..0.6 * CELL).contains(&lu) && (0.3 * CELL..0.75 * CELL).contains(&lv);
        if bar && self.inked.contains(&cell) {
            return 0;
        }
        255
    }
}

pub fn tilted_corners() -> [Point2<f32>; 4] {
    [
        Point2::new(60.0, 50.0),
        Point2::new(420.0, 70.0),
        Point2::new(440.0, 430.0),
        Point2::new(45.0, 410.0),
    ]
}

/// Square puzzle of side `side` centred on `(cx, cy)`, rotated by `degrees`
/// (positive is clockwise on screen). Corners are TL, TR, BR, BL of the page.
pub fn rotated_corners(cx: f32, cy: f32, side: f32, degrees: f32) -> [Point2<f32>; 4] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let h = side / 2.0;
    [(-h, -h), (h, -h), (h, h), (-h, h)]
        .map(|(dx, dy)| Point2::new(cx + dx * cos - dy * sin, cy + dx * sin + dy * cos))
}
