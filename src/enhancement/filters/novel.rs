//! ACE-ME: Adaptive Contrast Enhancement with Multi-scale Edge fusion.
//!
//! Five stages, each consuming the previous one:
//!
//! 1. bilateral denoising, kept as the fusion baseline
//! 2. fine and mid detail layers added back onto the denoised image
//! 3. CLAHE local contrast equalization
//! 4. gamma derived from the mean intensity, pulling it towards mid-gray
//! 5. Sobel-weighted blend towards the baseline at strong edges, damping halos

use tracing::debug;

use crate::enhancement::common::error::{FilterError, FilterOutcome};
use crate::enhancement::filters::{
    clahe::Clahe,
    frequency::finite_range,
    gamma::gamma_correct,
    spatial::{add_weighted, bilateral, gaussian_blur, sobel_magnitude},
};
use crate::enhancement::raster::GrayImageData;

pub const DENOISE_DIAMETER: usize = 9;
pub const DENOISE_SIGMA_COLOR: f64 = 75.0;
pub const DENOISE_SIGMA_SPACE: f64 = 75.0;

pub const FINE_KERNEL: usize = 5;
pub const FINE_SIGMA: f64 = 1.0;
pub const FINE_WEIGHT: f64 = 0.8;
pub const MID_KERNEL: usize = 9;
pub const MID_SIGMA: f64 = 2.0;
pub const MID_WEIGHT: f64 = 0.5;

pub const CLAHE_CLIP_LIMIT: f64 = 2.5;
pub const CLAHE_TILES: usize = 8;

pub const MEAN_CLAMP: (f64, f64) = (0.01, 0.99);
pub const GAMMA_CLAMP: (f64, f64) = (0.5, 2.0);

/// Share of the denoised baseline mixed in at the strongest edge.
pub const EDGE_DAMPING: f64 = 0.3;

/// Result of one ACE-ME run together with its derived parameters.
#[derive(Debug, Clone)]
pub struct AceMeOutput {
    pub image: GrayImageData,
    /// Mean intensity of the CLAHE stage on a 0–1 scale, after clamping
    pub mean_intensity: f64,
    pub gamma: f64,
}

/// Gamma that maps mean intensity `mu` (0–1) to 0.5, kept within [`GAMMA_CLAMP`].
pub fn adaptive_gamma(mu: f64) -> f64 {
    let mu = mu.clamp(MEAN_CLAMP.0, MEAN_CLAMP.1);
    (0.5f64.ln() / mu.ln()).clamp(GAMMA_CLAMP.0, GAMMA_CLAMP.1)
}

/// Stage 2: sharpened image from fine and mid detail layers.
///
/// Detail layers are saturating differences, so only positive detail survives.
pub fn multi_scale_detail(denoised: &GrayImageData) -> GrayImageData {
    let fine_blur = gaussian_blur(denoised, FINE_KERNEL, FINE_SIGMA);
    let mid_blur = gaussian_blur(denoised, MID_KERNEL, MID_SIGMA);

    let fine = add_weighted(denoised, 1.0, &fine_blur, -1.0, 0.0);
    let mid = add_weighted(denoised, 1.0, &mid_blur, -1.0, 0.0);

    let sharp = add_weighted(denoised, 1.0, &fine, FINE_WEIGHT, 0.0);
    add_weighted(&sharp, 1.0, &mid, MID_WEIGHT, 0.0)
}

/// Stage 5: `alpha * enhanced + (1 - alpha) * baseline`, `alpha = 1 - 0.3 * |grad|`.
pub fn edge_guided_fusion(enhanced: &GrayImageData, baseline: &GrayImageData) -> FilterOutcome {
    let magnitude = sobel_magnitude(baseline);
    let (min, max) = finite_range(&magnitude, "sobel magnitude")?;
    let range = max - min;

    let data = enhanced
        .data
        .iter()
        .zip(&baseline.data)
        .zip(&magnitude)
        .map(|((&e, &b), &m)| {
            let m_norm = if range > 0.0 { (m - min) / range } else { 0.0 };
            let alpha = (1.0 - EDGE_DAMPING * m_norm) as f32;
            let fused = e as f32 * alpha + b as f32 * (1.0 - alpha);
            fused.clamp(0.0, 255.0) as u8
        })
        .collect();

    Ok(GrayImageData {
        width: enhanced.width,
        height: enhanced.height,
        data,
    })
}

/// Runs all five stages and reports the derived gamma.
pub fn run(image: &GrayImageData) -> Result<AceMeOutput, FilterError> {
    let denoised = bilateral(image, DENOISE_DIAMETER, DENOISE_SIGMA_COLOR, DENOISE_SIGMA_SPACE);
    let sharp = multi_scale_detail(&denoised);
    let equalized = Clahe::new(CLAHE_CLIP_LIMIT, CLAHE_TILES, CLAHE_TILES).apply(&sharp);

    let mean_intensity = (equalized.stats().mean / 255.0).clamp(MEAN_CLAMP.0, MEAN_CLAMP.1);
    let gamma = adaptive_gamma(mean_intensity);
    if !gamma.is_finite() {
        return Err(FilterError::NonFinite { stage: "adaptive gamma" });
    }
    debug!(mean_intensity, gamma, "ACE-ME adaptive gamma");

    let corrected = gamma_correct(&equalized, gamma);
    let fused = edge_guided_fusion(&corrected, &denoised)?;

    Ok(AceMeOutput {
        image: fused,
        mean_intensity,
        gamma,
    })
}

pub fn ace_me(image: &GrayImageData) -> FilterOutcome {
    run(image).map(|output| output.image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adaptive_gamma_stays_in_bounds() {
        for mu in [0.0, 1e-9, 0.01, 0.2, 0.5, 0.8, 0.99, 1.0] {
            let g = adaptive_gamma(mu);
            assert!((GAMMA_CLAMP.0..=GAMMA_CLAMP.1).contains(&g), "mu={mu} gamma={g}");
        }
        assert!((adaptive_gamma(0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn dark_images_get_brightening_gamma() {
        assert!(adaptive_gamma(0.3) < 1.0);
        assert!(adaptive_gamma(0.7) > 1.0);
    }

    #[test]
    fn extreme_inputs_keep_gamma_bounded() {
        for value in [0u8, 255u8] {
            let img = GrayImageData::filled(40, 30, value);
            let out = run(&img).unwrap();
            assert!((GAMMA_CLAMP.0..=GAMMA_CLAMP.1).contains(&out.gamma));
            assert!((MEAN_CLAMP.0..=MEAN_CLAMP.1).contains(&out.mean_intensity));
            assert_eq!(out.gamma, adaptive_gamma(out.mean_intensity));
            assert_eq!(out.image.dimensions(), (40, 30));
        }
    }

    #[test]
    fn fusion_without_edges_returns_enhanced() {
        let enhanced = GrayImageData::filled(8, 8, 200);
        let baseline = GrayImageData::filled(8, 8, 50);
        let fused = edge_guided_fusion(&enhanced, &baseline).unwrap();
        assert!(fused.data.iter().all(|&v| v == 200));
    }

    #[test]
    fn fusion_damps_strongest_edge_by_thirty_percent() {
        let baseline = GrayImageData::from_fn(8, 8, |x, _| if x < 4 { 0 } else { 100 });
        let enhanced = GrayImageData::filled(8, 8, 200);
        let fused = edge_guided_fusion(&enhanced, &baseline).unwrap();
        // Columns 3 and 4 carry the peak gradient.
        let v = fused.get(3, 4);
        assert_eq!(v, (200.0f32 * 0.7 + 0.0 * 0.3) as u8);
        assert_eq!(fused.get(0, 0), 200);
    }
}
