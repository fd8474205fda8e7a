//! Two-stage combinations of the spatial, contrast and wavelet primitives.

use crate::enhancement::common::error::FilterOutcome;
use crate::enhancement::filters::{
    clahe::Clahe,
    frequency::normalize_to_u8,
    gamma::gamma_correct,
    spatial::{laplacian_sharpen, median_blur},
    wavelet::{Plane, bayes_shrink_denoise, default_levels},
};
use crate::enhancement::raster::GrayImageData;

pub const MEDIAN_KERNEL: usize = 5;
pub const MEDIAN_GAMMA: f64 = 1.2;
pub const CLAHE_CLIP_LIMIT: f64 = 2.0;
pub const CLAHE_TILES: usize = 8;

pub fn median_gamma(image: &GrayImageData) -> FilterOutcome {
    let median = median_blur(image, MEDIAN_KERNEL)?;
    Ok(gamma_correct(&median, MEDIAN_GAMMA))
}

pub fn median_laplacian(image: &GrayImageData) -> FilterOutcome {
    let median = median_blur(image, MEDIAN_KERNEL)?;
    Ok(laplacian_sharpen(&median))
}

/// CLAHE followed by BayesShrink wavelet denoising on the `[0, 1]` scaled
/// image, clipped and stretched back to 8 bits.
pub fn clahe_wavelet(image: &GrayImageData) -> FilterOutcome {
    let equalized = Clahe::new(CLAHE_CLIP_LIMIT, CLAHE_TILES, CLAHE_TILES).apply(image);
    let plane = Plane {
        width: equalized.width,
        height: equalized.height,
        data: equalized.data.iter().map(|&v| v as f64 / 255.0).collect(),
    };

    let levels = default_levels(plane.width, plane.height);
    let denoised = bayes_shrink_denoise(&plane, levels);
    let clipped: Vec<f64> = denoised.data.iter().map(|v| v.clamp(0.0, 1.0)).collect();

    normalize_to_u8(&clipped, equalized.width, equalized.height, "wavelet reconstruction")
}
