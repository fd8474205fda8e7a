use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, info};

/// Wall-clock time spent in one filter.
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub duration: Duration,
}

#[derive(Debug, Default, Clone)]
pub struct EvaluationTimings {
    steps: Vec<StepTiming>,
    step_map: HashMap<String, Duration>,
}

impl EvaluationTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, name: impl Into<String>, duration: Duration) {
        let name = name.into();
        self.steps.push(StepTiming {
            name: name.clone(),
            duration,
        });
        *self.step_map.entry(name).or_insert(Duration::ZERO) += duration;
    }

    /// Sum of all filter durations; exceeds wall time when filters ran in parallel.
    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.step_map.get(name).copied()
    }

    pub fn slowest(&self) -> Option<&StepTiming> {
        self.steps.iter().max_by_key(|s| s.duration)
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn log_summary(&self) {
        let total = self.total_duration();
        for step in &self.steps {
            let percentage = if total.as_secs_f64() > 0.0 {
                (step.duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            debug!(
                filter = %step.name,
                ms = step.duration.as_secs_f64() * 1000.0,
                share = format_args!("{percentage:.1}%"),
                "Filter timing"
            );
        }
        if let Some(slowest) = self.slowest() {
            info!(
                total_ms = total.as_secs_f64() * 1000.0,
                slowest = %slowest.name,
                slowest_ms = slowest.duration.as_secs_f64() * 1000.0,
                "Filter time summary"
            );
        }
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    pub fn stop(self) -> (String, Duration) {
        (self.name, self.start.elapsed())
    }
}
