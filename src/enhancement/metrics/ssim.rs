//! Mean structural similarity over uniform 7x7 windows.
//!
//! Constants follow Wang et al. (K1 = 0.01, K2 = 0.03) with sample
//! covariance. The averaged map excludes the three-pixel border where the
//! window would leave the image. The caller passes the dynamic range; the
//! evaluator uses the candidate's own `max - min`, not 255, which makes values
//! for outputs with different spans not directly comparable.

use crate::enhancement::raster::GrayImageData;

pub const WINDOW: usize = 7;
const K1: f64 = 0.01;
const K2: f64 = 0.03;

/// Summed-area table with a zero first row and column.
struct IntegralImage {
    stride: usize,
    sums: Vec<f64>,
}

impl IntegralImage {
    fn build(width: usize, height: usize, value: impl Fn(usize) -> f64) -> Self {
        let stride = width + 1;
        let mut sums = vec![0.0f64; stride * (height + 1)];
        for y in 0..height {
            let mut row_sum = 0.0;
            for x in 0..width {
                row_sum += value(y * width + x);
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row_sum;
            }
        }
        Self { stride, sums }
    }

    /// Sum over `[x0, x1) x [y0, y1)`.
    #[inline]
    fn window_sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> f64 {
        let s = self.stride;
        self.sums[y1 * s + x1] - self.sums[y0 * s + x1] - self.sums[y1 * s + x0] + self.sums[y0 * s + x0]
    }
}

struct WindowStats {
    ux: f64,
    uy: f64,
    uxx: f64,
    uyy: f64,
    uxy: f64,
}

fn local_ssim(stats: &WindowStats, cov_norm: f64, c1: f64, c2: f64) -> f64 {
    let WindowStats { ux, uy, uxx, uyy, uxy } = *stats;
    let vx = cov_norm * (uxx - ux * ux);
    let vy = cov_norm * (uyy - uy * uy);
    let vxy = cov_norm * (uxy - ux * uy);

    let a1 = 2.0 * ux * uy + c1;
    let a2 = 2.0 * vxy + c2;
    let b1 = ux * ux + uy * uy + c1;
    let b2 = vx + vy + c2;
    (a1 * a2) / (b1 * b2)
}

/// Mean SSIM between two same-shape images.
///
/// Images smaller than the window are scored as a single global window.
/// Undefined results (a zero data range over flat regions) are reported as 0.
pub fn structural_similarity(reference: &GrayImageData, candidate: &GrayImageData, data_range: f64) -> f64 {
    let (w, h) = reference.dimensions();
    if w == 0 || h == 0 {
        return 0.0;
    }

    let c1 = (K1 * data_range).powi(2);
    let c2 = (K2 * data_range).powi(2);
    let x = &reference.data;
    let y = &candidate.data;

    let value = if w < WINDOW || h < WINDOW {
        let n = (w * h) as f64;
        let cov_norm = if n > 1.0 { n / (n - 1.0) } else { 1.0 };
        let mean = |f: &dyn Fn(usize) -> f64| (0..w * h).map(f).sum::<f64>() / n;
        let stats = WindowStats {
            ux: mean(&|i| x[i] as f64),
            uy: mean(&|i| y[i] as f64),
            uxx: mean(&|i| (x[i] as f64).powi(2)),
            uyy: mean(&|i| (y[i] as f64).powi(2)),
            uxy: mean(&|i| x[i] as f64 * y[i] as f64),
        };
        local_ssim(&stats, cov_norm, c1, c2)
    } else {
        let sx = IntegralImage::build(w, h, |i| x[i] as f64);
        let sy = IntegralImage::build(w, h, |i| y[i] as f64);
        let sxx = IntegralImage::build(w, h, |i| (x[i] as f64).powi(2));
        let syy = IntegralImage::build(w, h, |i| (y[i] as f64).powi(2));
        let sxy = IntegralImage::build(w, h, |i| x[i] as f64 * y[i] as f64);

        let np = (WINDOW * WINDOW) as f64;
        let cov_norm = np / (np - 1.0);

        let mut total = 0.0;
        let mut count = 0usize;
        for y0 in 0..=h - WINDOW {
            for x0 in 0..=w - WINDOW {
                let (x1, y1) = (x0 + WINDOW, y0 + WINDOW);
                let stats = WindowStats {
                    ux: sx.window_sum(x0, y0, x1, y1) / np,
                    uy: sy.window_sum(x0, y0, x1, y1) / np,
                    uxx: sxx.window_sum(x0, y0, x1, y1) / np,
                    uyy: syy.window_sum(x0, y0, x1, y1) / np,
                    uxy: sxy.window_sum(x0, y0, x1, y1) / np,
                };
                total += local_ssim(&stats, cov_norm, c1, c2);
                count += 1;
            }
        }
        total / count as f64
    };

    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured(w: usize, h: usize) -> GrayImageData {
        GrayImageData::from_fn(w, h, |x, y| ((x * 29 + y * 11 + x * y) % 200) as u8 + 20)
    }

    fn range_of(img: &GrayImageData) -> f64 {
        let s = img.stats();
        (s.max - s.min) as f64
    }

    #[test]
    fn self_similarity_is_one() {
        let img = textured(30, 20);
        let ssim = structural_similarity(&img, &img, range_of(&img));
        assert!((ssim - 1.0).abs() < 1e-9, "ssim={ssim}");
    }

    #[test]
    fn small_images_use_global_window() {
        let img = textured(5, 4);
        let ssim = structural_similarity(&img, &img, range_of(&img));
        assert!((ssim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn inverted_image_is_dissimilar() {
        let img = textured(24, 24);
        let inverted = GrayImageData {
            data: img.data.iter().map(|&v| 255 - v).collect(),
            ..img.clone()
        };
        let ssim = structural_similarity(&img, &inverted, range_of(&inverted));
        assert!(ssim < 0.0);
    }

    #[test]
    fn flat_candidate_is_finite() {
        let img = textured(16, 16);
        let flat = GrayImageData::filled(16, 16, 128);
        let ssim = structural_similarity(&img, &flat, 0.0);
        assert!(ssim.is_finite());
    }

    #[test]
    fn data_range_changes_magnitude() {
        let img = textured(32, 32);
        let noisy = GrayImageData {
            data: img.data.iter().enumerate().map(|(i, &v)| v.saturating_add((i % 7) as u8 * 3)).collect(),
            ..img.clone()
        };
        let narrow = structural_similarity(&img, &noisy, 10.0);
        let wide = structural_similarity(&img, &noisy, 255.0);
        assert!(narrow < wide);
    }
}
