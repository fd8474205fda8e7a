//! Haar wavelet denoising with BayesShrink soft thresholding.

use std::f64::consts::FRAC_1_SQRT_2;

/// Median absolute deviation to Gaussian sigma: the 0.75 quantile of N(0, 1).
const MAD_TO_SIGMA: f64 = 0.674_489_750_196_081_7;

/// Single-channel floating-point plane used for wavelet coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f64>,
}

impl Plane {
    fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    #[inline]
    fn at(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.width + x]
    }

    #[inline]
    fn set(&mut self, x: usize, y: usize, v: f64) {
        self.data[y * self.width + x] = v;
    }
}

/// Detail sub-bands of one decomposition level.
#[derive(Debug, Clone)]
pub struct DetailBands {
    /// Low-pass along rows, high-pass along columns
    pub horizontal: Plane,
    /// High-pass along rows, low-pass along columns
    pub vertical: Plane,
    pub diagonal: Plane,
}

impl DetailBands {
    fn bands_mut(&mut self) -> [&mut Plane; 3] {
        [&mut self.horizontal, &mut self.vertical, &mut self.diagonal]
    }
}

/// Number of decomposition levels used when none is given: three below the
/// deepest possible Haar level, but at least one.
pub fn default_levels(width: usize, height: usize) -> usize {
    let shortest = width.min(height).max(1);
    let max_level = shortest.ilog2() as usize;
    max_level.saturating_sub(3).max(1)
}

/// One Haar analysis step along a line; odd lengths repeat the last sample.
fn analyze_line(src: &[f64], approx: &mut [f64], detail: &mut [f64]) {
    let n = src.len();
    for k in 0..approx.len() {
        let a = src[2 * k];
        let b = if 2 * k + 1 < n { src[2 * k + 1] } else { a };
        approx[k] = (a + b) * FRAC_1_SQRT_2;
        detail[k] = (a - b) * FRAC_1_SQRT_2;
    }
}

/// Inverse of [`analyze_line`], writing at most `out.len()` samples.
fn synthesize_line(approx: &[f64], detail: &[f64], out: &mut [f64]) {
    for k in 0..approx.len() {
        let a = approx[k];
        let d = detail[k];
        if 2 * k < out.len() {
            out[2 * k] = (a + d) * FRAC_1_SQRT_2;
        }
        if 2 * k + 1 < out.len() {
            out[2 * k + 1] = (a - d) * FRAC_1_SQRT_2;
        }
    }
}

/// Single-level 2-D Haar decomposition.
pub fn dwt2(plane: &Plane) -> (Plane, DetailBands) {
    let (w, h) = (plane.width, plane.height);
    let cw = w.div_ceil(2);
    let ch = h.div_ceil(2);

    let mut low = Plane::zeros(cw, h);
    let mut high = Plane::zeros(cw, h);
    let mut a = vec![0.0; cw];
    let mut d = vec![0.0; cw];
    for y in 0..h {
        analyze_line(&plane.data[y * w..(y + 1) * w], &mut a, &mut d);
        low.data[y * cw..(y + 1) * cw].copy_from_slice(&a);
        high.data[y * cw..(y + 1) * cw].copy_from_slice(&d);
    }

    let split_columns = |src: &Plane| -> (Plane, Plane) {
        let mut lo = Plane::zeros(cw, ch);
        let mut hi = Plane::zeros(cw, ch);
        let mut column = vec![0.0; h];
        let mut a = vec![0.0; ch];
        let mut d = vec![0.0; ch];
        for x in 0..cw {
            for (y, slot) in column.iter_mut().enumerate() {
                *slot = src.at(x, y);
            }
            analyze_line(&column, &mut a, &mut d);
            for y in 0..ch {
                lo.set(x, y, a[y]);
                hi.set(x, y, d[y]);
            }
        }
        (lo, hi)
    };

    let (approx, horizontal) = split_columns(&low);
    let (vertical, diagonal) = split_columns(&high);
    (
        approx,
        DetailBands {
            horizontal,
            vertical,
            diagonal,
        },
    )
}

/// Single-level 2-D Haar reconstruction cropped to `width x height`.
pub fn idwt2(approx: &Plane, details: &DetailBands, width: usize, height: usize) -> Plane {
    let cw = approx.width;
    let ch = approx.height;

    let merge_columns = |lo: &Plane, hi: &Plane| -> Plane {
        let mut out = Plane::zeros(cw, height);
        let mut a = vec![0.0; ch];
        let mut d = vec![0.0; ch];
        let mut column = vec![0.0; height];
        for x in 0..cw {
            for y in 0..ch {
                a[y] = lo.at(x, y);
                d[y] = hi.at(x, y);
            }
            synthesize_line(&a, &d, &mut column);
            for (y, &v) in column.iter().enumerate() {
                out.set(x, y, v);
            }
        }
        out
    };

    let low = merge_columns(approx, &details.horizontal);
    let high = merge_columns(&details.vertical, &details.diagonal);

    let mut out = Plane::zeros(width, height);
    for y in 0..height {
        synthesize_line(
            &low.data[y * cw..(y + 1) * cw],
            &high.data[y * cw..(y + 1) * cw],
            &mut out.data[y * width..(y + 1) * width],
        );
    }
    out
}

/// Robust noise estimate from the finest diagonal band.
///
/// Exactly-zero coefficients are ignored; a band with none left yields 0.
pub fn estimate_noise_sigma(diagonal: &Plane) -> f64 {
    let mut magnitudes: Vec<f64> = diagonal
        .data
        .iter()
        .filter(|&&v| v != 0.0)
        .map(|v| v.abs())
        .collect();
    if magnitudes.is_empty() {
        return 0.0;
    }
    magnitudes.sort_by(f64::total_cmp);
    let n = magnitudes.len();
    let median = if n % 2 == 1 {
        magnitudes[n / 2]
    } else {
        (magnitudes[n / 2 - 1] + magnitudes[n / 2]) * 0.5
    };
    median / MAD_TO_SIGMA
}

/// BayesShrink threshold `sigma^2 / sigma_x` for one sub-band.
pub fn bayes_threshold(band: &Plane, noise_var: f64) -> f64 {
    if band.data.is_empty() {
        return 0.0;
    }
    let band_var = band.data.iter().map(|v| v * v).sum::<f64>() / band.data.len() as f64;
    noise_var / (band_var - noise_var).max(f64::EPSILON).sqrt()
}

#[inline]
pub fn soft_threshold(v: f64, threshold: f64) -> f64 {
    v.signum() * (v.abs() - threshold).max(0.0)
}

/// Multi-level Haar decomposition, per-band BayesShrink soft thresholding and
/// reconstruction. The approximation band is left untouched.
pub fn bayes_shrink_denoise(plane: &Plane, levels: usize) -> Plane {
    let mut shapes = Vec::with_capacity(levels);
    let mut details = Vec::with_capacity(levels);
    let mut approx = plane.clone();
    for _ in 0..levels.max(1) {
        shapes.push((approx.width, approx.height));
        let (next, bands) = dwt2(&approx);
        details.push(bands);
        approx = next;
    }

    let sigma = details
        .first()
        .map(|finest| estimate_noise_sigma(&finest.diagonal))
        .unwrap_or(0.0);
    let noise_var = sigma * sigma;

    for level in &mut details {
        for band in level.bands_mut() {
            let threshold = bayes_threshold(band, noise_var);
            for v in &mut band.data {
                *v = soft_threshold(*v, threshold);
            }
        }
    }

    for (bands, &(w, h)) in details.iter().zip(&shapes).rev() {
        approx = idwt2(&approx, bands, w, h);
    }
    approx
}
