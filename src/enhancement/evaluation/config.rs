//! Evaluation configuration types

/// Configuration for one evaluation run
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// Run catalog filters on the rayon thread pool instead of sequentially
    pub parallel: bool,
    /// Whether to enforce `max_dimension` before running any filter
    pub validate_dimensions: bool,
    /// Largest accepted side length, if bounded
    pub max_dimension: Option<usize>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            validate_dimensions: true,
            max_dimension: None,
        }
    }
}

impl EvaluationConfig {
    pub fn builder() -> EvaluationConfigBuilder {
        EvaluationConfigBuilder::default()
    }
}

/// Builder for EvaluationConfig
#[derive(Default)]
pub struct EvaluationConfigBuilder {
    parallel: Option<bool>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl EvaluationConfigBuilder {
    pub fn parallel(mut self, enable: bool) -> Self {
        self.parallel = Some(enable);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> EvaluationConfig {
        let default = EvaluationConfig::default();
        EvaluationConfig {
            parallel: self.parallel.unwrap_or(default.parallel),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}
