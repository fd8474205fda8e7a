//! Evaluation orchestration module
//!
//! Runs every catalog filter over one preprocessed image, scores each output
//! against that image and assembles the fixed-cardinality report.

mod config;
mod orchestrator;
mod report;
mod timing;

#[cfg(test)]
mod tests;

pub use config::{EvaluationConfig, EvaluationConfigBuilder};
pub use orchestrator::{Evaluator, evaluate};
pub use report::{EvaluationReport, FilterResult, FilterStatus};
pub use timing::{EvaluationTimings, StepTiming, Timer};
