use std::time::Duration;

use crate::enhancement::common::error::FilterError;
use crate::enhancement::evaluation::timing::EvaluationTimings;
use crate::enhancement::metrics::Metrics;
use crate::enhancement::raster::GrayImageData;

/// How a filter's output came to be in the report.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterStatus {
    Applied,
    /// The output had another shape and was resampled to the input's
    Resized { width: usize, height: usize },
    /// The filter failed; the result holds the input and zeroed metrics
    Failed(FilterError),
}

/// Outcome of one catalog entry for one image.
#[derive(Debug, Clone)]
pub struct FilterResult {
    pub name: &'static str,
    pub metrics: Metrics,
    pub image: GrayImageData,
    pub status: FilterStatus,
    pub elapsed: Duration,
}

impl FilterResult {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, FilterStatus::Failed(_))
    }
}

/// Every filter result for one input image, in catalog order.
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    width: usize,
    height: usize,
    results: Vec<FilterResult>,
}

impl EvaluationReport {
    pub(crate) fn new(width: usize, height: usize, results: Vec<FilterResult>) -> Self {
        Self { width, height, results }
    }

    /// Shape of the evaluated input, shared by every result image.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, name: &str) -> Option<&FilterResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.results.iter().map(|r| r.name).collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FilterResult> {
        self.results.iter().filter(|r| r.is_failed())
    }

    pub fn timings(&self) -> EvaluationTimings {
        let mut timings = EvaluationTimings::new();
        for result in &self.results {
            timings.add_step(result.name, result.elapsed);
        }
        timings
    }
}

impl<'a> IntoIterator for &'a EvaluationReport {
    type Item = &'a FilterResult;
    type IntoIter = std::slice::Iter<'a, FilterResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
