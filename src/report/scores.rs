//! Averaged category scores for the presentation layer.

use serde::Serialize;

use crate::report::types::AnalyticsReport;

/// Averaged score per audit category. A category with no present scores
/// averages to 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageScores {
    pub performance: f64,
    pub accessibility: f64,
    pub best_practices: f64,
    pub seo: f64,
}

/// Averages each category over the audit runs where that score is present.
///
/// Missing scores are excluded from the denominator rather than counted as
/// zero. This function is total: it runs in a presentation context where a
/// crash is worse than a zeroed chart, so any report, however sparse, yields
/// a well-formed result.
pub fn average_scores(report: &AnalyticsReport) -> AverageScores {
    let runs = &report.lighthouse_reports;

    AverageScores {
        performance: average(runs.iter().map(|r| r.performance)),
        accessibility: average(runs.iter().map(|r| r.accessibility)),
        best_practices: average(runs.iter().map(|r| r.best_practices)),
        seo: average(runs.iter().map(|r| r.seo)),
    }
}

/// Arithmetic mean over the present values. Returns 0.0 when none are present.
fn average(scores: impl Iterator<Item = Option<f64>>) -> f64 {
    let present: Vec<f64> = scores.flatten().collect();
    if present.is_empty() {
        return 0.0;
    }
    present.iter().sum::<f64>() / present.len() as f64
}
