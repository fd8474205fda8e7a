//! Preprocessing and export configuration types

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    #[default]
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression at the balanced level
    Deflate,
}

/// Configuration for turning a decoded photograph into an evaluation input
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Longest side allowed after downsampling; larger images are scaled down
    pub max_dimension: usize,
    /// Stretch intensities to the full 0–255 range after resizing
    pub normalize: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            max_dimension: 512,
            normalize: false,
        }
    }
}

impl PreprocessConfig {
    pub fn builder() -> PreprocessConfigBuilder {
        PreprocessConfigBuilder::default()
    }
}

/// Builder for PreprocessConfig
#[derive(Default)]
pub struct PreprocessConfigBuilder {
    max_dimension: Option<usize>,
    normalize: Option<bool>,
}

impl PreprocessConfigBuilder {
    pub fn max_dimension(mut self, max: usize) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn normalize(mut self, enable: bool) -> Self {
        self.normalize = Some(enable);
        self
    }

    pub fn build(self) -> PreprocessConfig {
        let default = PreprocessConfig::default();
        PreprocessConfig {
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            normalize: self.normalize.unwrap_or(default.normalize),
        }
    }
}

/// Configuration for writing an evaluation to disk
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Compression method for the per-filter TIFF files
    pub compression: TiffCompression,
    /// Write one TIFF per filter output
    pub write_images: bool,
    /// Write `metrics.csv` with the ranked table
    pub write_metrics: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::None,
            write_images: true,
            write_metrics: true,
        }
    }
}

impl ExportConfig {
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder::default()
    }
}

/// Builder for ExportConfig
#[derive(Default)]
pub struct ExportConfigBuilder {
    compression: Option<TiffCompression>,
    write_images: Option<bool>,
    write_metrics: Option<bool>,
}

impl ExportConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn write_images(mut self, enable: bool) -> Self {
        self.write_images = Some(enable);
        self
    }

    pub fn write_metrics(mut self, enable: bool) -> Self {
        self.write_metrics = Some(enable);
        self
    }

    pub fn build(self) -> ExportConfig {
        let default = ExportConfig::default();
        ExportConfig {
            compression: self.compression.unwrap_or(default.compression),
            write_images: self.write_images.unwrap_or(default.write_images),
            write_metrics: self.write_metrics.unwrap_or(default.write_metrics),
        }
    }
}
