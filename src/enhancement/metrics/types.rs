/// Quality metrics of one filter output against the reference image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    /// Peak signal-to-noise ratio in dB, 100 for identical images
    pub psnr: f64,
    /// Structural similarity using the candidate's own intensity span
    pub ssim: f64,
    /// Mean squared error
    pub mse: f64,
    /// Shannon entropy of the candidate histogram, in bits
    pub entropy: f64,
    /// Contrast improvement index (std ratio), 0 for a flat reference
    pub cii: f64,
}

impl Metrics {
    /// All-zero vector used for filters that failed.
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn is_zeroed(&self) -> bool {
        *self == Self::zeroed()
    }
}
