//! Image moments and the two moment-driven resamples: shear deskew and recentering.

use nalgebra::{Matrix2x3, Point2};
use sudoku_lens_core::{warp_affine_gray, GrayImage};

/// Spatial and central moments up to second order that the extractor needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub mu11: f64,
    pub mu02: f64,
    pub mu20: f64,
}

impl Moments {
    /// Intensity-weighted moments at integer pixel coordinates.
    pub fn of(img: &GrayImage) -> Self {
        let (mut m00, mut m10, mut m01) = (0.0, 0.0, 0.0);
        let (mut m11, mut m02, mut m20) = (0.0, 0.0, 0.0);
        for y in 0..img.height {
            for x in 0..img.width {
                let v = img.get(x, y) as f64;
                if v == 0.0 {
                    continue;
                }
                let (xf, yf) = (x as f64, y as f64);
                m00 += v;
                m10 += v * xf;
                m01 += v * yf;
                m11 += v * xf * yf;
                m20 += v * xf * xf;
                m02 += v * yf * yf;
            }
        }

        if m00 == 0.0 {
            return Self {
                m00,
                m10,
                m01,
                mu11: 0.0,
                mu02: 0.0,
                mu20: 0.0,
            };
        }
        let (cx, cy) = (m10 / m00, m01 / m00);
        Self {
            m00,
            m10,
            m01,
            mu11: m11 - cx * m01,
            mu02: m02 - cy * m01,
            mu20: m20 - cx * m10,
        }
    }

    /// Centre of mass, `None` for an empty image.
    pub fn centroid(&self) -> Option<Point2<f64>> {
        (self.m00 > 0.0).then(|| Point2::new(self.m10 / self.m00, self.m01 / self.m00))
    }

    /// Horizontal shear `mu11 / mu02`, `None` when the vertical spread vanishes.
    pub fn skew(&self) -> Option<f64> {
        (self.mu02.abs() > 1e-2 * self.m00.max(1.0)).then(|| self.mu11 / self.mu02)
    }
}

/// Force a resampled mask back to `{0, 255}`.
pub fn binarize(img: &mut GrayImage, level: u8) {
    for v in img.data.iter_mut() {
        *v = if *v >= level { 255 } else { 0 };
    }
}

/// Undo a horizontal shear: `dst(x, y) = src(x + skew * (y - h / 2), y)`.
///
/// Returns the input unchanged when the mask has no measurable skew.
pub fn deskew(mask: &GrayImage, level: u8) -> GrayImage {
    let Some(skew) = Moments::of(mask).skew() else {
        return mask.clone();
    };
    let half = mask.height as f64 * 0.5;
    let m = Matrix2x3::new(1.0, skew, -skew * half, 0.0, 1.0, 0.0);
    let mut out = warp_affine_gray(&mask.view(), &m, mask.width, mask.height);
    binarize(&mut out, level);
    out
}

/// Translate the centre of mass onto the image centre.
pub fn recenter(mask: &GrayImage, level: u8) -> GrayImage {
    let Some(c) = Moments::of(mask).centroid() else {
        return mask.clone();
    };
    let dx = c.x - mask.width as f64 * 0.5;
    let dy = c.y - mask.height as f64 * 0.5;
    let m = Matrix2x3::new(1.0, 0.0, dx, 0.0, 1.0, dy);
    let mut out = warp_affine_gray(&mask.view(), &m, mask.width, mask.height);
    binarize(&mut out, level);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn block(w: usize, h: usize, x0: usize, x1: usize, y0: usize, y1: usize) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for y in y0..y1 {
            for x in x0..x1 {
                img.set(x, y, 255);
            }
        }
        img
    }

    #[test]
    fn centroid_of_block() {
        let m = Moments::of(&block(20, 20, 2, 6, 10, 14));
        let c = m.centroid().expect("non-empty");
        assert_abs_diff_eq!(c.x, 3.5);
        assert_abs_diff_eq!(c.y, 11.5);
        assert_abs_diff_eq!(m.mu11, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn empty_mask_has_no_centroid_or_skew() {
        let m = Moments::of(&GrayImage::new(8, 8));
        assert!(m.centroid().is_none());
        assert!(m.skew().is_none());
    }

    #[test]
    fn slanted_stroke_is_straightened() {
        // Stroke leaning right by one pixel every two rows.
        let mut img = GrayImage::new(20, 20);
        for y in 4..16 {
            let x = 6 + (y - 4) / 2;
            img.set(x, y, 255);
            img.set(x + 1, y, 255);
        }
        let before = Moments::of(&img).skew().expect("spread");
        assert!(before > 0.3);

        let out = deskew(&img, 128);
        let after = Moments::of(&out).skew().expect("spread");
        assert!(after.abs() < before.abs() * 0.5, "after={after}");
        assert!(out.data.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn recentering_moves_mass_to_middle() {
        let out = recenter(&block(20, 20, 3, 6, 3, 6), 128);
        let c = Moments::of(&out).centroid().expect("non-empty");
        assert_abs_diff_eq!(c.x, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(c.y, 10.0, epsilon = 1e-9);
        assert_eq!(out.count_nonzero(), 9);
    }
}
