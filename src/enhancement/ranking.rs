//! Winner selection and the display table of an evaluation.

use std::cmp::Ordering;

use tracing::info;

use crate::enhancement::evaluation::EvaluationReport;
use crate::enhancement::filters::names;
use crate::enhancement::metrics::Metrics;

/// One row of the display table.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub name: &'static str,
    pub metrics: Metrics,
    /// Composite score; `None` for the `Original` baseline, which never competes
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingReport {
    /// Every entry, sorted by SSIM then CII, both descending
    pub rows: Vec<RankedRow>,
    pub winner: Option<&'static str>,
}

impl RankingReport {
    pub fn winner_row(&self) -> Option<&RankedRow> {
        let winner = self.winner?;
        self.rows.iter().find(|row| row.name == winner)
    }
}

/// Per-axis divisor; zero when the axis has no positive maximum.
fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| v.is_finite()).fold(0.0, f64::max)
}

fn normalized(value: f64, max: f64) -> f64 {
    if max > 0.0 && value.is_finite() {
        value / max
    } else {
        0.0
    }
}

/// Descending, with NaN after every number.
fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Scores every non-baseline entry as the sum of its SSIM, CII and PSNR, each
/// divided by that metric's maximum across candidates, and picks the highest.
/// Ties go to the entry seen first in catalog order.
pub fn rank(report: &EvaluationReport) -> RankingReport {
    let candidates: Vec<_> = report.iter().filter(|r| r.name != names::ORIGINAL).collect();

    let max_ssim = axis_max(candidates.iter().map(|r| r.metrics.ssim));
    let max_cii = axis_max(candidates.iter().map(|r| r.metrics.cii));
    let max_psnr = axis_max(candidates.iter().map(|r| r.metrics.psnr));

    let score_of = |m: &Metrics| {
        normalized(m.ssim, max_ssim) + normalized(m.cii, max_cii) + normalized(m.psnr, max_psnr)
    };

    let mut winner: Option<(&'static str, f64)> = None;
    for candidate in &candidates {
        let score = score_of(&candidate.metrics);
        if winner.is_none_or(|(_, best)| score > best) {
            winner = Some((candidate.name, score));
        }
    }

    let mut rows: Vec<RankedRow> = report
        .iter()
        .map(|r| RankedRow {
            name: r.name,
            metrics: r.metrics,
            score: (r.name != names::ORIGINAL).then(|| score_of(&r.metrics)),
        })
        .collect();
    rows.sort_by(|a, b| {
        descending(a.metrics.ssim, b.metrics.ssim).then(descending(a.metrics.cii, b.metrics.cii))
    });

    if let Some((name, score)) = winner {
        info!(winner = name, score, "Selected best filter");
    }

    RankingReport {
        rows,
        winner: winner.map(|(name, _)| name),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::enhancement::evaluation::{FilterResult, FilterStatus};
    use crate::enhancement::raster::GrayImageData;

    fn result(name: &'static str, psnr: f64, ssim: f64, cii: f64) -> FilterResult {
        FilterResult {
            name,
            metrics: Metrics {
                psnr,
                ssim,
                mse: 1.0,
                entropy: 5.0,
                cii,
            },
            image: GrayImageData::filled(2, 2, 0),
            status: FilterStatus::Applied,
            elapsed: Duration::ZERO,
        }
    }

    fn report(results: Vec<FilterResult>) -> EvaluationReport {
        EvaluationReport::new(2, 2, results)
    }

    #[test]
    fn dominating_candidate_wins() {
        let ranking = rank(&report(vec![
            result(names::ORIGINAL, 100.0, 1.0, 1.0),
            result(names::MEAN, 30.0, 0.80, 0.90),
            result(names::CLAHE, 35.0, 0.85, 1.20),
            result(names::GAUSSIAN, 28.0, 0.70, 0.85),
        ]));
        assert_eq!(ranking.winner, Some(names::CLAHE));
        let row = ranking.winner_row().unwrap();
        assert!((row.score.unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn original_never_wins() {
        let ranking = rank(&report(vec![
            result(names::ORIGINAL, 100.0, 1.0, 1.0),
            result(names::MEAN, 20.0, 0.5, 0.5),
        ]));
        assert_eq!(ranking.winner, Some(names::MEAN));
        let original = ranking.rows.iter().find(|r| r.name == names::ORIGINAL).unwrap();
        assert_eq!(original.score, None);
    }

    #[test]
    fn ties_go_to_first_in_catalog_order() {
        let ranking = rank(&report(vec![
            result(names::ORIGINAL, 100.0, 1.0, 1.0),
            result(names::MEDIAN, 30.0, 0.8, 1.0),
            result(names::MEAN, 30.0, 0.8, 1.0),
        ]));
        assert_eq!(ranking.winner, Some(names::MEDIAN));
    }

    #[test]
    fn no_candidates_no_winner() {
        let ranking = rank(&report(vec![result(names::ORIGINAL, 100.0, 1.0, 1.0)]));
        assert_eq!(ranking.winner, None);
        assert_eq!(ranking.rows.len(), 1);
    }

    #[test]
    fn non_positive_axis_contributes_nothing() {
        let ranking = rank(&report(vec![
            result(names::MEAN, 20.0, -0.2, 0.0),
            result(names::MEDIAN, 10.0, -0.1, 0.0),
        ]));
        assert_eq!(ranking.winner, Some(names::MEAN));
        let mean = ranking.rows.iter().find(|r| r.name == names::MEAN).unwrap();
        assert_eq!(mean.score, Some(1.0));
    }

    #[test]
    fn rows_sorted_by_ssim_then_cii_with_nan_last() {
        let ranking = rank(&report(vec![
            result(names::ORIGINAL, 100.0, 1.0, 1.0),
            result(names::MEAN, 30.0, f64::NAN, 2.0),
            result(names::MEDIAN, 30.0, 0.9, 0.8),
            result(names::GAUSSIAN, 30.0, 0.9, 1.1),
            result(names::BILATERAL, 30.0, 0.95, 0.5),
        ]));
        let order: Vec<_> = ranking.rows.iter().map(|r| r.name).collect();
        assert_eq!(
            order,
            vec![
                names::ORIGINAL,
                names::BILATERAL,
                names::GAUSSIAN,
                names::MEDIAN,
                names::MEAN
            ]
        );
    }

    #[test]
    fn failed_entries_rank_last_among_candidates() {
        let mut failed = result(names::ACE_ME_NOVEL, 0.0, 0.0, 0.0);
        failed.status = FilterStatus::Failed(crate::enhancement::common::error::FilterError::NonFinite {
            stage: "test",
        });
        let ranking = rank(&report(vec![result(names::MEAN, 25.0, 0.6, 0.7), failed]));
        assert_eq!(ranking.winner, Some(names::MEAN));
        assert_eq!(ranking.rows.last().unwrap().name, names::ACE_ME_NOVEL);
    }
}
