//! Data types for the assembled analytics report.
//!
//! These are the shapes stored in the blob store and returned by the HTTP
//! endpoint, serialized in camelCase for the dashboard.

use serde::{Deserialize, Serialize};

/// One Lighthouse run, reduced to the scores and metrics the dashboard
/// consumes. Scores live in the closed unit interval; a category whose score
/// is null in the raw document stays `None` here and is never coerced to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub form_factor: String,
    pub performance: Option<f64>,
    pub accessibility: Option<f64>,
    pub best_practices: Option<f64>,
    pub seo: Option<f64>,
    /// Largest-contentful-paint, milliseconds.
    pub largest_contentful_paint: f64,
    /// Total byte weight of the audited page, bytes.
    pub total_byte_weight: f64,
}

/// Grand-total entry of a [`SizeBreakdown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalBytes {
    pub bytes: u64,
}

/// Byte count, share of the bundle, and contributing files for one asset
/// category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub bytes: u64,
    /// Percentage of the grand total, rounded to one decimal place.
    pub percentage: f64,
    /// Asset names in their original input order.
    pub files: Vec<String>,
}

/// Bundle size grouped by asset category.
///
/// Every asset belongs to exactly one category, so the per-category byte
/// counts sum to `total`. Percentages are rounded independently and may not
/// sum to exactly 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeBreakdown {
    pub total: TotalBytes,
    pub javascript: CategoryBreakdown,
    pub css: CategoryBreakdown,
    pub html: CategoryBreakdown,
    pub images: CategoryBreakdown,
    pub other: CategoryBreakdown,
}

/// Bundle-analysis section of a report, present only when a webpack stats
/// document was supplied to the build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebpackAnalyticsReport {
    /// Build duration, carried verbatim from the raw stats document.
    pub build_time_seconds: f64,
    pub size_breakdown: SizeBreakdown,
}

/// The unit of storage and transfer: one build's metrics, keyed by `time`.
///
/// Reports are immutable once persisted; each build appends a new partition
/// under `<time>/analytics.json` and nothing updates or deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    /// ISO-8601 timestamp identifying the partition. Required at upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// One entry per device run, in input order. May be empty.
    pub lighthouse_reports: Vec<AuditResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webpack_analytics_report: Option<WebpackAnalyticsReport>,
}
