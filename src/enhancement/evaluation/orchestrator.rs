use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::enhancement::common::error::{EnhancementError, Result};
use crate::enhancement::evaluation::config::EvaluationConfig;
use crate::enhancement::evaluation::report::{EvaluationReport, FilterResult, FilterStatus};
use crate::enhancement::evaluation::timing::Timer;
use crate::enhancement::filters::{FilterCatalog, FilterSpec};
use crate::enhancement::metrics::{Metrics, compute_metrics};
use crate::enhancement::raster::{GrayImageData, resize_bilinear};

pub struct Evaluator {
    catalog: FilterCatalog,
    config: EvaluationConfig,
}

impl Evaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self {
            catalog: FilterCatalog::standard(),
            config,
        }
    }

    pub fn with_catalog(catalog: FilterCatalog, config: EvaluationConfig) -> Self {
        Self { catalog, config }
    }

    fn validate_input(&self, image: &GrayImageData) -> Result<()> {
        image.validate()?;

        if !self.config.validate_dimensions {
            return Ok(());
        }
        if let Some(max) = self.config.max_dimension {
            if image.width > max || image.height > max {
                return Err(EnhancementError::InvalidDimensions(image.width, image.height));
            }
        }
        Ok(())
    }

    /// Runs every catalog filter on `image` and scores the outputs against it.
    ///
    /// Only an unusable input fails; individual filter failures become
    /// fallback entries holding the input and zeroed metrics.
    #[instrument(skip(self, image), fields(width = image.width, height = image.height))]
    pub fn evaluate(&self, image: &GrayImageData) -> Result<EvaluationReport> {
        self.validate_input(image)?;

        info!(
            filters = self.catalog.len(),
            parallel = self.config.parallel,
            "Starting evaluation"
        );

        let results: Vec<FilterResult> = if self.config.parallel {
            self.catalog
                .specs()
                .par_iter()
                .map(|spec| run_filter(spec, image))
                .collect()
        } else {
            self.catalog
                .iter()
                .map(|spec| run_filter(spec, image))
                .collect()
        };

        let report = EvaluationReport::new(image.width, image.height, results);
        let failed = report.failures().count();
        report.timings().log_summary();
        info!(results = report.len(), failed, "Evaluation complete");

        Ok(report)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EvaluationConfig::default())
    }
}

/// Evaluates the standard catalog with the default configuration.
pub fn evaluate(image: &GrayImageData) -> Result<EvaluationReport> {
    Evaluator::default().evaluate(image)
}

fn run_filter(spec: &FilterSpec, image: &GrayImageData) -> FilterResult {
    let _span = tracing::debug_span!("filter", name = spec.name).entered();
    let timer = Timer::start(spec.name);

    let outcome = (spec.apply)(image).and_then(|output| {
        if output.same_shape(image) {
            return Ok((output, FilterStatus::Applied));
        }
        let (width, height) = output.dimensions();
        let resized = resize_bilinear(&output, image.width, image.height)?;
        Ok((resized, FilterStatus::Resized { width, height }))
    });

    let (output, metrics, status) = match outcome {
        Ok((output, status)) => {
            let metrics = compute_metrics(image, &output);
            (output, metrics, status)
        }
        Err(err) => {
            warn!(filter = spec.name, error = %err, "Filter failed, using input as fallback");
            (image.clone(), Metrics::zeroed(), FilterStatus::Failed(err))
        }
    };

    let (_, elapsed) = timer.stop();
    debug!(
        psnr = metrics.psnr,
        ssim = metrics.ssim,
        cii = metrics.cii,
        ms = elapsed.as_secs_f64() * 1000.0,
        "Filter scored"
    );

    FilterResult {
        name: spec.name,
        metrics,
        image: output,
        status,
        elapsed,
    }
}
