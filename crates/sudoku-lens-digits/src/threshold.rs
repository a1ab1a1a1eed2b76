//! Adaptive local-mean thresholding.

use sudoku_lens_core::GrayImage;

/// Smallest odd window that is at least `size`.
#[inline]
pub fn odd_window(size: usize) -> usize {
    size.max(1) | 1
}

/// Inverted adaptive mean threshold.
///
/// A pixel becomes foreground (255) when it is at least `bias` below the mean
/// of the `window x window` neighbourhood around it. Borders replicate the
/// edge pixels. `window` is forced odd.
pub fn adaptive_mean_threshold_inv(src: &GrayImage, window: usize, bias: i32) -> GrayImage {
    let (w, h) = (src.width, src.height);
    let mut out = GrayImage::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }

    let r = odd_window(window) / 2;
    let area = ((2 * r + 1) * (2 * r + 1)) as u32;

    let mut rows = vec![0u32; w * h];
    let mut line = vec![0u32; w.max(h)];
    let mut sums = vec![0u32; w.max(h)];

    for y in 0..h {
        for x in 0..w {
            line[x] = src.get(x, y) as u32;
        }
        box_sum_replicate(&line[..w], &mut sums[..w], r);
        rows[y * w..(y + 1) * w].copy_from_slice(&sums[..w]);
    }

    for x in 0..w {
        for y in 0..h {
            line[y] = rows[y * w + x];
        }
        box_sum_replicate(&line[..h], &mut sums[..h], r);
        for y in 0..h {
            let mean = ((sums[y] + area / 2) / area) as i32;
            if src.get(x, y) as i32 - mean <= -bias {
                out.set(x, y, 255);
            }
        }
    }
    out
}

/// Sliding sum over `[i - r, i + r]` with clamped indices.
fn box_sum_replicate(src: &[u32], dst: &mut [u32], r: usize) {
    let n = src.len() as isize;
    let at = |i: isize| src[i.clamp(0, n - 1) as usize];
    let r = r as isize;

    let mut sum: u32 = (-r..=r).map(at).sum();
    for i in 0..n {
        dst[i as usize] = sum;
        sum = sum + at(i + r + 1) - at(i - r);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_rounded_up_to_odd() {
        assert_eq!(odd_window(40), 41);
        assert_eq!(odd_window(41), 41);
        assert_eq!(odd_window(0), 1);
    }

    #[test]
    fn replicated_box_sum_matches_naive() {
        let src = [3u32, 1, 4, 1, 5];
        let mut dst = [0u32; 5];
        box_sum_replicate(&src, &mut dst, 1);
        assert_eq!(dst, [3 + 3 + 1, 3 + 1 + 4, 1 + 4 + 1, 4 + 1 + 5, 1 + 5 + 5]);
    }

    #[test]
    fn dark_stroke_on_paper_is_foreground() {
        let mut img = GrayImage::from_raw(20, 20, vec![220; 400]).expect("sized");
        for y in 5..15 {
            img.set(10, y, 30);
        }
        let bin = adaptive_mean_threshold_inv(&img, 21, 10);
        assert_eq!(bin.get(10, 8), 255);
        assert_eq!(bin.get(3, 8), 0);
        assert_eq!(bin.count_nonzero(), 10);
    }

    #[test]
    fn flat_image_has_no_foreground() {
        let img = GrayImage::from_raw(8, 8, vec![90; 64]).expect("sized");
        assert_eq!(adaptive_mean_threshold_inv(&img, 9, 10).count_nonzero(), 0);
    }
}
