//! Image input and report export module
//!
//! Decoding and preprocessing of fundus photographs ahead of evaluation, and
//! writing evaluation results back out as TIFF rasters and a metrics table.

mod reader;
mod writer;
pub mod types;


pub use reader::{FundusImageReader, ImageReader, load_image, stretch_contrast, to_gray_bt601};
pub use writer::{RasterWriter, ReportExporter, StandardTiffWriter, write_metrics_csv};
pub use types::{
    ExportConfig, ExportConfigBuilder, PreprocessConfig, PreprocessConfigBuilder, TiffCompression,
};
