//! Grayscale raster module
//!
//! The single-channel 8-bit image every filter consumes and produces, together
//! with the border handling, separable correlation and resampling primitives
//! the filters are built from.

pub mod types;
pub mod border;
mod resize;

pub use types::{GrayImageData, IntensityStats};
pub use border::{BorderMode, round_saturate};
pub use resize::{resize_bilinear, scaled_dimensions};
