use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnhancementError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode input image: {0}")]
    DecodeError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Pixel buffer holds {actual} samples, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EnhancementError>;

/// Failure of a single catalog filter.
///
/// The evaluator turns these into fallback results, they never abort an
/// evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("non-finite values produced in {stage}")]
    NonFinite { stage: &'static str },

    #[error("invalid filter parameter: {0}")]
    InvalidParameter(String),

    #[error("raster error: {0}")]
    Raster(String),
}

impl From<EnhancementError> for FilterError {
    fn from(err: EnhancementError) -> Self {
        FilterError::Raster(err.to_string())
    }
}

pub type FilterOutcome = std::result::Result<crate::enhancement::GrayImageData, FilterError>;
