//! Output formatting and persistence for assembled reports.
//!
//! The local JSON file is the build's durable sink, written before the
//! upload step and overwritten on every run.

use anyhow::Result;
use tracing::{debug, info};

use crate::report::types::AnalyticsReport;
use std::fs;

/// Default path of the local report sink.
pub const DEFAULT_REPORT_PATH: &str = "./analyticsReport.json";

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &AnalyticsReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes `report` to `path` as pretty-printed JSON with 2-space
/// indentation, replacing any previous run's file.
pub fn write_report(path: &str, report: &AnalyticsReport) -> Result<()> {
    debug!(path, "Writing local analytics report");
    fs::write(path, serde_json::to_string_pretty(report)?)?;
    Ok(())
}
