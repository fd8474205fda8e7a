//! Frequency-domain filters built on a 2-D FFT.
//!
//! Every filter here centres the zero frequency before applying its transfer
//! function, uncentres before the inverse transform and renormalises the
//! result to the full 8-bit range.

use rustfft::{FftDirection, FftPlanner, num_complex::Complex};
use tracing::trace;

use crate::enhancement::common::error::{FilterError, FilterOutcome};
use crate::enhancement::raster::GrayImageData;

pub const LOW_PASS_CUTOFF: f64 = 60.0;
pub const HIGH_PASS_CUTOFF: f64 = 30.0;

pub const HOMOMORPHIC_D0: f64 = 30.0;
pub const HOMOMORPHIC_C: f64 = 1.0;
pub const HOMOMORPHIC_GAMMA_HIGH: f64 = 1.6;
pub const HOMOMORPHIC_GAMMA_LOW: f64 = 0.5;

/// Radially symmetric gain applied to the centred spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransferFunction {
    IdealLowPass { cutoff: f64 },
    GaussianLowPass { cutoff: f64 },
    IdealHighPass { cutoff: f64 },
    Homomorphic {
        d0: f64,
        c: f64,
        gamma_high: f64,
        gamma_low: f64,
    },
}

impl TransferFunction {
    /// Gain at squared distance `d_sq` from the spectrum centre.
    pub fn gain(&self, d_sq: f64) -> f64 {
        match *self {
            TransferFunction::IdealLowPass { cutoff } => {
                if d_sq <= cutoff * cutoff { 1.0 } else { 0.0 }
            }
            TransferFunction::GaussianLowPass { cutoff } => (-d_sq / (2.0 * cutoff * cutoff)).exp(),
            TransferFunction::IdealHighPass { cutoff } => {
                if d_sq <= cutoff * cutoff { 0.0 } else { 1.0 }
            }
            TransferFunction::Homomorphic {
                d0,
                c,
                gamma_high,
                gamma_low,
            } => (gamma_high - gamma_low) * (1.0 - (-c * (d_sq / (d0 * d0))).exp()) + gamma_low,
        }
    }

    /// Gain evaluated over a centred `width x height` grid.
    pub fn mask(&self, width: usize, height: usize) -> Vec<f64> {
        let crow = (height / 2) as f64;
        let ccol = (width / 2) as f64;
        let mut mask = Vec::with_capacity(width * height);
        for y in 0..height {
            let dy = y as f64 - crow;
            for x in 0..width {
                let dx = x as f64 - ccol;
                mask.push(self.gain(dx * dx + dy * dy));
            }
        }
        mask
    }
}

/// In-place 2-D FFT, rows then columns. The inverse is scaled by `1 / (w * h)`.
pub fn fft_2d(buffer: &mut [Complex<f64>], width: usize, height: usize, direction: FftDirection) {
    let mut planner = FftPlanner::<f64>::new();

    let row_fft = planner.plan_fft(width, direction);
    row_fft.process(buffer);

    let mut columns = transpose(buffer, width, height);
    let col_fft = planner.plan_fft(height, direction);
    col_fft.process(&mut columns);
    let rows = transpose(&columns, height, width);
    buffer.copy_from_slice(&rows);

    if direction == FftDirection::Inverse {
        let scale = 1.0 / (width * height) as f64;
        for v in buffer.iter_mut() {
            *v *= scale;
        }
    }
}

fn transpose<T: Copy>(src: &[T], width: usize, height: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(src.len());
    for x in 0..width {
        for y in 0..height {
            out.push(src[y * width + x]);
        }
    }
    out
}

/// Moves the zero-frequency term to the centre of the grid.
pub fn fft_shift<T: Copy>(src: &[T], width: usize, height: usize) -> Vec<T> {
    roll(src, width, height, width / 2, height / 2)
}

/// Exact inverse of [`fft_shift`].
pub fn ifft_shift<T: Copy>(src: &[T], width: usize, height: usize) -> Vec<T> {
    roll(src, width, height, width - width / 2, height - height / 2)
}

fn roll<T: Copy>(src: &[T], width: usize, height: usize, dx: usize, dy: usize) -> Vec<T> {
    let mut out = src.to_vec();
    for y in 0..height {
        let ty = (y + dy) % height;
        for x in 0..width {
            let tx = (x + dx) % width;
            out[ty * width + tx] = src[y * width + x];
        }
    }
    out
}

/// Forward transform, centred masking, inverse transform.
fn filter_spectrum(values: &[f64], width: usize, height: usize, transfer: &TransferFunction) -> Vec<Complex<f64>> {
    let mut spectrum: Vec<Complex<f64>> = values.iter().map(|&v| Complex::new(v, 0.0)).collect();
    fft_2d(&mut spectrum, width, height, FftDirection::Forward);

    let mut centred = fft_shift(&spectrum, width, height);
    for (bin, gain) in centred.iter_mut().zip(transfer.mask(width, height)) {
        *bin *= gain;
    }

    let mut restored = ifft_shift(&centred, width, height);
    fft_2d(&mut restored, width, height, FftDirection::Inverse);
    restored
}

/// Linear min-max stretch of `values` onto `[0, 255]`, truncated to `u8`.
///
/// A constant input maps to all zeros.
pub fn normalize_to_u8(values: &[f64], width: usize, height: usize, stage: &'static str) -> FilterOutcome {
    let (min, max) = finite_range(values, stage)?;
    let range = max - min;
    let data = if range > 0.0 {
        values.iter().map(|&v| ((v - min) / range * 255.0) as u8).collect()
    } else {
        vec![0u8; values.len()]
    };
    Ok(GrayImageData { width, height, data })
}

/// Minimum and maximum of `values`, failing on NaN or infinities.
pub fn finite_range(values: &[f64], stage: &'static str) -> Result<(f64, f64), FilterError> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if !v.is_finite() {
            return Err(FilterError::NonFinite { stage });
        }
        min = min.min(v);
        max = max.max(v);
    }
    Ok((min, max))
}

/// Applies `transfer` and keeps the magnitude of the inverse transform.
pub fn apply_transfer(image: &GrayImageData, transfer: TransferFunction) -> FilterOutcome {
    let (w, h) = image.dimensions();
    trace!(?transfer, width = w, height = h, "Applying frequency-domain filter");
    let restored = filter_spectrum(&image.to_f64(), w, h, &transfer);
    let magnitude: Vec<f64> = restored.iter().map(|c| c.norm()).collect();
    normalize_to_u8(&magnitude, w, h, "inverse FFT magnitude")
}

pub fn ideal_low_pass(image: &GrayImageData) -> FilterOutcome {
    apply_transfer(image, TransferFunction::IdealLowPass { cutoff: LOW_PASS_CUTOFF })
}

pub fn gaussian_low_pass(image: &GrayImageData) -> FilterOutcome {
    apply_transfer(image, TransferFunction::GaussianLowPass { cutoff: LOW_PASS_CUTOFF })
}

pub fn ideal_high_pass(image: &GrayImageData) -> FilterOutcome {
    apply_transfer(image, TransferFunction::IdealHighPass { cutoff: HIGH_PASS_CUTOFF })
}

/// Log-domain filtering that boosts reflectance and damps illumination.
pub fn homomorphic(image: &GrayImageData) -> FilterOutcome {
    let (w, h) = image.dimensions();
    let transfer = TransferFunction::Homomorphic {
        d0: HOMOMORPHIC_D0,
        c: HOMOMORPHIC_C,
        gamma_high: HOMOMORPHIC_GAMMA_HIGH,
        gamma_low: HOMOMORPHIC_GAMMA_LOW,
    };

    let log_image: Vec<f64> = image.data.iter().map(|&v| (v as f64).ln_1p()).collect();
    let restored = filter_spectrum(&log_image, w, h, &transfer);
    let linear: Vec<f64> = restored.iter().map(|c| c.re.exp_m1()).collect();
    normalize_to_u8(&linear, w, h, "homomorphic exponentiation")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured(w: usize, h: usize) -> GrayImageData {
        GrayImageData::from_fn(w, h, |x, y| ((x * 37 + y * 91 + (x * y) % 17) % 256) as u8)
    }

    #[test]
    fn shift_round_trip_odd_and_even() {
        for (w, h) in [(4, 4), (5, 3), (7, 6)] {
            let src: Vec<usize> = (0..w * h).collect();
            let back = ifft_shift(&fft_shift(&src, w, h), w, h);
            assert_eq!(back, src);
        }
    }

    #[test]
    fn shift_moves_dc_to_centre() {
        let mut src = vec![0u8; 6 * 5];
        src[0] = 1;
        let shifted = fft_shift(&src, 6, 5);
        assert_eq!(shifted[2 * 6 + 3], 1);
    }

    #[test]
    fn forward_then_inverse_restores_signal() {
        let img = textured(12, 9);
        let mut buf: Vec<Complex<f64>> = img.data.iter().map(|&v| Complex::new(v as f64, 0.0)).collect();
        fft_2d(&mut buf, 12, 9, FftDirection::Forward);
        fft_2d(&mut buf, 12, 9, FftDirection::Inverse);
        for (c, &v) in buf.iter().zip(&img.data) {
            assert!((c.re - v as f64).abs() < 1e-9);
            assert!(c.im.abs() < 1e-9);
        }
    }

    #[test]
    fn transfer_gains_match_definitions() {
        let lpf = TransferFunction::IdealLowPass { cutoff: 60.0 };
        assert_eq!(lpf.gain(3600.0), 1.0);
        assert_eq!(lpf.gain(3601.0), 0.0);

        let hpf = TransferFunction::IdealHighPass { cutoff: 30.0 };
        assert_eq!(hpf.gain(0.0), 0.0);
        assert_eq!(hpf.gain(901.0), 1.0);

        let glpf = TransferFunction::GaussianLowPass { cutoff: 60.0 };
        assert_eq!(glpf.gain(0.0), 1.0);
        assert!((glpf.gain(7200.0) - (-1.0f64).exp()).abs() < 1e-12);

        let homo = TransferFunction::Homomorphic {
            d0: HOMOMORPHIC_D0,
            c: HOMOMORPHIC_C,
            gamma_high: HOMOMORPHIC_GAMMA_HIGH,
            gamma_low: HOMOMORPHIC_GAMMA_LOW,
        };
        assert!((homo.gain(0.0) - 0.5).abs() < 1e-12);
        assert!((homo.gain(1e9) - 1.6).abs() < 1e-9);
    }

    #[test]
    fn frequency_filters_span_full_range() {
        let img = textured(64, 48);
        for filter in [ideal_low_pass, gaussian_low_pass, ideal_high_pass, homomorphic] {
            let out = filter(&img).unwrap();
            assert_eq!(out.dimensions(), (64, 48));
            let stats = out.stats();
            assert_eq!(stats.min, 0);
            assert_eq!(stats.max, 255);
        }
    }

    #[test]
    fn normalize_maps_extremes_exactly_for_any_range() {
        for k in 1..2000 {
            let low = -(k as f64) * 0.137;
            let high = k as f64 * 0.371_830_5;
            let out = normalize_to_u8(&[low, (low + high) / 2.0, high], 3, 1, "test").unwrap();
            assert_eq!(out.data[0], 0, "range [{low}, {high}]");
            assert_eq!(out.data[2], 255, "range [{low}, {high}]");
        }
    }

    #[test]
    fn normalize_constant_maps_to_zero() {
        let out = normalize_to_u8(&[3.0; 6], 3, 2, "test").unwrap();
        assert_eq!(out.data, vec![0; 6]);
    }

    #[test]
    fn normalize_rejects_non_finite() {
        let err = normalize_to_u8(&[0.0, f64::NAN], 2, 1, "test").unwrap_err();
        assert_eq!(err, FilterError::NonFinite { stage: "test" });
    }
}
