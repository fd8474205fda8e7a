//! Fundus enhancement engine module
//!
//! Runs a fixed bank of spatial, frequency-domain and hybrid filters over a
//! grayscale retinal image, scores every output against the input and picks
//! the best performer. Decoding and export live in [`io`].

pub mod common;
pub mod raster;
pub mod filters;
pub mod metrics;
pub mod evaluation;
pub mod ranking;
pub mod io;

pub use common::{
    EnhancementError,
    FilterError,
    FilterOutcome,
    Result,
};

pub use raster::GrayImageData;

pub use filters::{
    FilterCatalog,
    FilterSpec,
    names,
};

pub use metrics::{
    Metrics,
    compute_metrics,
};

pub use evaluation::{
    EvaluationConfig,
    EvaluationConfigBuilder,
    EvaluationReport,
    Evaluator,
    FilterResult,
    FilterStatus,
    evaluate,
};

pub use ranking::{
    RankedRow,
    RankingReport,
    rank,
};

pub use io::{
    ExportConfig,
    FundusImageReader,
    ImageReader,
    PreprocessConfig,
    RasterWriter,
    ReportExporter,
    StandardTiffWriter,
    TiffCompression,
    load_image,
};
