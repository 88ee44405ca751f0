//! CLI entry point for the site-analytics pipeline.
//!
//! Provides subcommands for building an analytics report from raw audit and
//! bundle documents, serving the aggregated history over HTTP, and
//! summarizing a local report's category scores.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use site_analytics::config::StoreConfig;
use site_analytics::fetch::load_document;
use site_analytics::output;
use site_analytics::parser::{RawLighthouseReport, parse_lighthouse, parse_webpack_stats};
use site_analytics::report::builder::build_report;
use site_analytics::report::scores::average_scores;
use site_analytics::report::types::AnalyticsReport;
use site_analytics::server::{self, AppState};
use site_analytics::store::upload_report;

#[derive(Parser)]
#[command(name = "site-analytics")]
#[command(about = "Aggregates build-time performance metrics into a blob store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an analytics report from raw documents and upload it
    Build {
        /// Semicolon-separated lighthouse report paths or URLs
        #[arg(long = "lighthouseReportPaths", value_name = "PATHS")]
        lighthouse_report_paths: Option<String>,

        /// Webpack stats document path or URL
        #[arg(long = "webpackAnalyticsReportPath", value_name = "PATH")]
        webpack_analytics_report_path: Option<String>,

        /// Local file the assembled report is written to
        #[arg(short, long, default_value = output::DEFAULT_REPORT_PATH)]
        output: String,
    },
    /// Serve the aggregated report history over HTTP
    Serve {
        /// Address to bind
        #[arg(short, long, default_value = "0.0.0.0:3080")]
        bind: String,
    },
    /// Log the average category scores of a local report file
    Summarize {
        /// Path to a previously built report
        #[arg(default_value = output::DEFAULT_REPORT_PATH)]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/site_analytics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("site_analytics.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            lighthouse_report_paths,
            webpack_analytics_report_path,
            output,
        } => {
            run_build(lighthouse_report_paths, webpack_analytics_report_path, &output).await?;
        }
        Commands::Serve { bind } => {
            let store = StoreConfig::from_env().open().await?;
            server::serve(&bind, Arc::new(AppState { store })).await?;
        }
        Commands::Summarize { path } => {
            run_summarize(&path)?;
        }
    }

    Ok(())
}

/// Reads and validates the raw inputs, assembles the report, writes the
/// local sink, then uploads to the configured store. The local file is
/// written before the upload; when the upload fails the file stays behind,
/// which is accepted rather than hidden.
async fn run_build(
    lighthouse_paths: Option<String>,
    webpack_path: Option<String>,
    output_path: &str,
) -> Result<()> {
    let audits = load_lighthouse_reports(lighthouse_paths.as_deref()).await?;

    let bundle = match webpack_path {
        Some(source) => {
            info!(%source, "Reading webpack stats");
            let bytes = load_document(&source).await?;
            Some(parse_webpack_stats(&bytes)?)
        }
        None => None,
    };

    let report = build_report(audits, bundle);
    output::write_report(output_path, &report)?;

    let store = StoreConfig::from_env().open().await?;
    let key = upload_report(store.as_ref(), &report)
        .await
        .context("uploading analytics report")?;
    info!(%key, store = store.name(), "Analytics report uploaded");

    Ok(())
}

/// Splits the semicolon-separated list and loads each entry. A path missing
/// on disk is skipped with a warning; malformed content in a present
/// document is fatal for the whole build.
async fn load_lighthouse_reports(paths: Option<&str>) -> Result<Vec<RawLighthouseReport>> {
    let Some(paths) = paths else {
        return Ok(Vec::new());
    };

    let mut audits = Vec::new();
    for source in paths.split(';').filter(|s| !s.is_empty()) {
        if !source.starts_with("http") && !Path::new(source).exists() {
            warn!(source, "Lighthouse report path does not exist; skipping");
            continue;
        }
        info!(source, "Reading lighthouse report");
        let bytes = load_document(source).await?;
        audits.push(parse_lighthouse(&bytes)?);
    }

    Ok(audits)
}

/// Loads a local report and logs its averaged category scores. A file that
/// does not deserialize degrades to zeroed scores instead of failing; this
/// path feeds display, not storage.
fn run_summarize(path: &str) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading '{path}'"))?;

    let report: AnalyticsReport = match serde_json::from_slice(&bytes) {
        Ok(report) => report,
        Err(e) => {
            warn!(error = %e, "Report does not deserialize; scores will be zero");
            AnalyticsReport {
                time: None,
                lighthouse_reports: Vec::new(),
                webpack_analytics_report: None,
            }
        }
    };

    output::print_json(&report)?;

    let scores = average_scores(&report);
    info!(
        runs = report.lighthouse_reports.len(),
        performance = scores.performance,
        accessibility = scores.accessibility,
        best_practices = scores.best_practices,
        seo = scores.seo,
        "Average category scores"
    );

    Ok(())
}
