use image::imageops::{self, FilterType};

use crate::enhancement::common::error::Result;
use crate::enhancement::raster::types::GrayImageData;

/// Bilinearly resamples `image` to exactly `width x height`.
///
/// Returns a clone when the shape already matches.
pub fn resize_bilinear(image: &GrayImageData, width: usize, height: usize) -> Result<GrayImageData> {
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }
    let source = image.to_gray_image()?;
    let resized = imageops::resize(&source, width as u32, height as u32, FilterType::Triangle);
    Ok(GrayImageData::from(resized))
}

/// Dimensions after bounding the longer side to `max_dimension`, aspect preserved.
///
/// Sides are truncated, never rounded up, and never drop below one pixel.
pub fn scaled_dimensions(width: usize, height: usize, max_dimension: usize) -> (usize, usize) {
    let longest = width.max(height);
    if longest <= max_dimension || longest == 0 {
        return (width, height);
    }
    let scale = max_dimension as f64 / longest as f64;
    let w = ((width as f64 * scale) as usize).max(1);
    let h = ((height as f64 * scale) as usize).max(1);
    (w, h)
}
