//! Image quality metrics
//!
//! Compares one filter output against the preprocessed original.

mod types;
pub mod ssim;

pub use types::Metrics;
pub use ssim::structural_similarity;

use tracing::trace;

use crate::enhancement::raster::{GrayImageData, resize_bilinear};

/// PSNR reported for identical images instead of infinity.
pub const PSNR_IDENTICAL: f64 = 100.0;

const MAX_INTENSITY: f64 = 255.0;

/// Mean squared error, computed in floating point.
pub fn mean_squared_error(reference: &GrayImageData, candidate: &GrayImageData) -> f64 {
    if reference.data.is_empty() {
        return 0.0;
    }
    let sum: f64 = reference
        .data
        .iter()
        .zip(&candidate.data)
        .map(|(&r, &c)| {
            let d = r as f64 - c as f64;
            d * d
        })
        .sum();
    sum / reference.data.len() as f64
}

pub fn peak_signal_to_noise(mse: f64) -> f64 {
    if mse == 0.0 {
        PSNR_IDENTICAL
    } else {
        20.0 * (MAX_INTENSITY / mse.sqrt()).log10()
    }
}

/// Shannon entropy of the intensity histogram, in bits.
pub fn shannon_entropy(image: &GrayImageData) -> f64 {
    let total = image.data.len() as f64;
    if total == 0.0 {
        return 0.0;
    }
    image
        .histogram()
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Contrast improvement index: ratio of standard deviations, 0 for a flat reference.
pub fn contrast_improvement_index(reference: &GrayImageData, candidate: &GrayImageData) -> f64 {
    let reference_std = reference.stats().std_dev;
    if reference_std == 0.0 {
        return 0.0;
    }
    candidate.stats().std_dev / reference_std
}

/// Computes the full metric vector of `candidate` relative to `reference`.
///
/// A candidate of a different shape is resized to the reference first.
pub fn compute_metrics(reference: &GrayImageData, candidate: &GrayImageData) -> Metrics {
    let resized;
    let candidate = if candidate.same_shape(reference) {
        candidate
    } else {
        trace!(
            from = ?candidate.dimensions(),
            to = ?reference.dimensions(),
            "Resizing candidate before scoring"
        );
        match resize_bilinear(candidate, reference.width, reference.height) {
            Ok(image) => {
                resized = image;
                &resized
            }
            Err(_) => return Metrics::zeroed(),
        }
    };

    let mse = mean_squared_error(reference, candidate);
    let stats = candidate.stats();
    let data_range = (stats.max - stats.min) as f64;

    Metrics {
        psnr: peak_signal_to_noise(mse),
        ssim: structural_similarity(reference, candidate, data_range),
        mse,
        entropy: shannon_entropy(candidate),
        cii: contrast_improvement_index(reference, candidate),
    }
}
