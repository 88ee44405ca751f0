//! Merges validated raw documents into one timestamped report.

use chrono::{SecondsFormat, Utc};

use crate::parser::{RawLighthouseReport, RawWebpackStats};
use crate::report::assets::size_breakdown;
use crate::report::types::{AnalyticsReport, AuditResult, WebpackAnalyticsReport};

impl From<RawLighthouseReport> for AuditResult {
    // Extraction only; scores pass through untouched, no rounding.
    fn from(raw: RawLighthouseReport) -> Self {
        Self {
            form_factor: raw.form_factor,
            performance: raw.performance,
            accessibility: raw.accessibility,
            best_practices: raw.best_practices,
            seo: raw.seo,
            largest_contentful_paint: raw.largest_contentful_paint,
            total_byte_weight: raw.total_byte_weight,
        }
    }
}

/// Builds an [`AnalyticsReport`] from zero or more audit runs and at most one
/// bundle-analysis document.
///
/// Audit results keep their input order, one entry per device run. The report
/// is always stamped with the current UTC instant, whether or not a bundle
/// document is present, so every build can be uploaded under its timestamp.
pub fn build_report(
    audits: Vec<RawLighthouseReport>,
    bundle: Option<RawWebpackStats>,
) -> AnalyticsReport {
    let lighthouse_reports = audits.into_iter().map(AuditResult::from).collect();

    let webpack_analytics_report = bundle.map(|stats| WebpackAnalyticsReport {
        build_time_seconds: stats.time,
        size_breakdown: size_breakdown(&stats.assets),
    });

    AnalyticsReport {
        time: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        lighthouse_reports,
        webpack_analytics_report,
    }
}
