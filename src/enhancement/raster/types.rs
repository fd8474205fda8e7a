//! Raster data types

use image::GrayImage;

use crate::enhancement::common::error::{EnhancementError, Result};

/// Decoded single-channel 8-bit image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Row-major intensity samples, `width * height` long
    pub data: Vec<u8>,
}

/// First and second order intensity statistics of a raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityStats {
    pub min: u8,
    pub max: u8,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

impl GrayImageData {
    /// Wraps a pixel buffer, checking that it matches the given dimensions.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width * height;
        if data.len() != expected {
            return Err(EnhancementError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Builds a raster by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// Fails on empty rasters and on buffers that disagree with the dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EnhancementError::InvalidDimensions(self.width, self.height));
        }
        let expected = self.width * self.height;
        if self.data.len() != expected {
            return Err(EnhancementError::BufferSizeMismatch {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn same_shape(&self, other: &GrayImageData) -> bool {
        self.width == other.width && self.height == other.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Applies a 256-entry lookup table to every sample.
    pub fn map_lut(&self, lut: &[u8; 256]) -> GrayImageData {
        GrayImageData {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| lut[v as usize]).collect(),
        }
    }

    pub fn to_f64(&self) -> Vec<f64> {
        self.data.iter().map(|&v| v as f64).collect()
    }

    pub fn stats(&self) -> IntensityStats {
        if self.data.is_empty() {
            return IntensityStats {
                min: 0,
                max: 0,
                mean: 0.0,
                std_dev: 0.0,
            };
        }

        let mut min = u8::MAX;
        let mut max = u8::MIN;
        let mut sum = 0.0f64;
        for &v in &self.data {
            min = min.min(v);
            max = max.max(v);
            sum += v as f64;
        }
        let n = self.data.len() as f64;
        let mean = sum / n;
        let var = self
            .data
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;

        IntensityStats {
            min,
            max,
            mean,
            std_dev: var.sqrt(),
        }
    }

    /// 256-bin intensity histogram.
    pub fn histogram(&self) -> [u64; 256] {
        let mut hist = [0u64; 256];
        for &v in &self.data {
            hist[v as usize] += 1;
        }
        hist
    }

    pub fn to_gray_image(&self) -> Result<GrayImage> {
        GrayImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
            .ok_or(EnhancementError::InvalidDimensions(self.width, self.height))
    }
}

impl From<GrayImage> for GrayImageData {
    fn from(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width: width as usize,
            height: height as usize,
            data: image.into_raw(),
        }
    }
}
