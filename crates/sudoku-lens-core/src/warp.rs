use crate::{sample_bilinear_u8, GrayImage, GrayImageView, Homography};
use nalgebra::{Matrix2x3, Point2, Vector3};

/// Warp into rectified image: for each dst pixel, map to src via H_img_from_rect and sample.
pub fn warp_perspective_gray(
    src: &GrayImageView<'_>,
    h_img_from_rect: Homography,
    out_w: usize,
    out_h: usize,
) -> GrayImage {
    let mut out = vec![0u8; out_w * out_h];

    for y in 0..out_h {
        for x in 0..out_w {
            // sample at pixel center
            let pr = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
            let pi = h_img_from_rect.apply(pr);
            out[y * out_w + x] = sample_bilinear_u8(src, pi.x - 0.5, pi.y - 0.5);
        }
    }

    GrayImage {
        width: out_w,
        height: out_h,
        data: out,
    }
}

/// Affine resample with an inverse map: `src = m_src_from_dst * [x, y, 1]`.
///
/// Pixels that map outside `src` read as zero.
pub fn warp_affine_gray(
    src: &GrayImageView<'_>,
    m_src_from_dst: &Matrix2x3<f64>,
    out_w: usize,
    out_h: usize,
) -> GrayImage {
    let mut out = vec![0u8; out_w * out_h];

    for y in 0..out_h {
        for x in 0..out_w {
            let p = m_src_from_dst * Vector3::new(x as f64, y as f64, 1.0);
            out[y * out_w + x] = sample_bilinear_u8(src, p[0] as f32, p[1] as f32);
        }
    }

    GrayImage {
        width: out_w,
        height: out_h,
        data: out,
    }
}
