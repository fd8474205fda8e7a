use std::path::Path;

use image::{DynamicImage, GrayImage, Luma};
use tracing::{debug, info, instrument};

use crate::enhancement::common::error::{EnhancementError, Result};
use crate::enhancement::io::types::PreprocessConfig;
use crate::enhancement::raster::{GrayImageData, resize_bilinear, round_saturate, scaled_dimensions};

pub trait ImageReader {
    /// Decodes encoded image bytes into a preprocessed grayscale raster.
    fn read_image(&self, data: &[u8], config: &PreprocessConfig) -> Result<GrayImageData>;
}

/// Reads any format the `image` crate decodes (PNG, JPEG, TIFF, BMP).
pub struct FundusImageReader;

impl ImageReader for FundusImageReader {
    #[instrument(skip(self, data, config), fields(input_size = data.len()))]
    fn read_image(&self, data: &[u8], config: &PreprocessConfig) -> Result<GrayImageData> {
        let decoded = image::load_from_memory(data)
            .map_err(|e| EnhancementError::DecodeError(e.to_string()))?;
        debug!(width = decoded.width(), height = decoded.height(), "Decoded input image");

        let gray = GrayImageData::from(to_gray_bt601(&decoded));
        gray.validate()?;

        let (width, height) = scaled_dimensions(gray.width, gray.height, config.max_dimension);
        let bounded = if (width, height) == gray.dimensions() {
            gray
        } else {
            debug!(
                from = ?gray.dimensions(),
                to = ?(width, height),
                "Downsampling to bounded size"
            );
            resize_bilinear(&gray, width, height)?
        };

        Ok(if config.normalize {
            stretch_contrast(&bounded)
        } else {
            bounded
        })
    }
}

/// Converts to single-channel luma with BT.601 weights, rounding to nearest.
pub fn to_gray_bt601(image: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }
    let rgb = image.to_rgb8();
    let mut gray = GrayImage::new(rgb.width(), rgb.height());
    for (x, y, p) in rgb.enumerate_pixels() {
        let luma = 0.299 * p.0[0] as f64 + 0.587 * p.0[1] as f64 + 0.114 * p.0[2] as f64;
        gray.put_pixel(x, y, Luma([round_saturate(luma)]));
    }
    gray
}

/// Linear min–max stretch to 0–255. Flat images are returned unchanged.
pub fn stretch_contrast(image: &GrayImageData) -> GrayImageData {
    let stats = image.stats();
    if stats.max == stats.min {
        return image.clone();
    }
    let (min, span) = (stats.min as f64, (stats.max - stats.min) as f64);
    let mut lut = [0u8; 256];
    for (v, slot) in lut.iter_mut().enumerate() {
        *slot = round_saturate((v as f64 - min) * 255.0 / span);
    }
    image.map_lut(&lut)
}

/// Reads and preprocesses the image file at `path`.
pub fn load_image<R: ImageReader, P: AsRef<Path>>(
    reader: &R,
    path: P,
    config: &PreprocessConfig,
) -> Result<GrayImageData> {
    let path = path.as_ref();
    let bytes = {
        let _span = tracing::info_span!("read_input_file").entered();
        std::fs::read(path)
            .map_err(|e| EnhancementError::InputReadError(format!("{}: {}", path.display(), e)))?
    };

    let image = reader.read_image(&bytes, config)?;
    info!(
        input = %path.display(),
        width = image.width,
        height = image.height,
        "Loaded input image"
    );
    Ok(image)
}
