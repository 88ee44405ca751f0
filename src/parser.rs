//! Parse-and-validate for the raw documents the report builder consumes.
//!
//! Lighthouse and webpack emit deeply nested JSON; everything the pipeline
//! needs is pulled into small typed documents here, failing fast with the
//! path of the first missing field instead of deep inside the transform.
//! Upstream tooling is trusted to produce well-formed output, so a missing
//! field aborts the whole build rather than being papered over.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::AnalyticsError;

/// A Lighthouse run reduced to the fields the report builder consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLighthouseReport {
    pub form_factor: String,
    pub performance: Option<f64>,
    pub accessibility: Option<f64>,
    pub best_practices: Option<f64>,
    pub seo: Option<f64>,
    pub largest_contentful_paint: f64,
    pub total_byte_weight: f64,
}

/// One entry from the webpack stats `assets` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawAsset {
    pub name: String,
    pub size: u64,
}

/// A webpack stats document reduced to build duration and asset list.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWebpackStats {
    pub time: f64,
    pub assets: Vec<RawAsset>,
}

#[derive(Debug, Deserialize)]
struct LighthouseDoc {
    #[serde(rename = "configSettings")]
    config_settings: Option<ConfigSettings>,
    categories: Option<Categories>,
    audits: Option<Audits>,
}

#[derive(Debug, Deserialize)]
struct ConfigSettings {
    #[serde(rename = "formFactor")]
    form_factor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Categories {
    performance: Option<Category>,
    accessibility: Option<Category>,
    #[serde(rename = "best-practices")]
    best_practices: Option<Category>,
    seo: Option<Category>,
}

// Lighthouse sets `score` to null when a category fails to compute; null is
// kept distinct from a missing category object.
#[derive(Debug, Deserialize)]
struct Category {
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Audits {
    #[serde(rename = "largest-contentful-paint")]
    largest_contentful_paint: Option<NumericAudit>,
    #[serde(rename = "total-byte-weight")]
    total_byte_weight: Option<NumericAudit>,
}

#[derive(Debug, Deserialize)]
struct NumericAudit {
    #[serde(rename = "numericValue")]
    numeric_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WebpackDoc {
    time: Option<f64>,
    #[serde(default)]
    assets: Vec<RawAsset>,
}

fn require<T>(value: Option<T>, path: &str) -> Result<T> {
    value.ok_or_else(|| {
        AnalyticsError::MalformedInput {
            path: path.to_string(),
        }
        .into()
    })
}

/// Validates a raw Lighthouse report into a [`RawLighthouseReport`].
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON, or
/// [`AnalyticsError::MalformedInput`] naming the first missing field path.
pub fn parse_lighthouse(bytes: &[u8]) -> Result<RawLighthouseReport> {
    let doc: LighthouseDoc =
        serde_json::from_slice(bytes).context("lighthouse report is not valid JSON")?;

    let settings = require(doc.config_settings, "configSettings")?;
    let categories = require(doc.categories, "categories")?;
    let audits = require(doc.audits, "audits")?;

    let lcp = require(
        audits.largest_contentful_paint,
        "audits.largest-contentful-paint",
    )?;
    let byte_weight = require(audits.total_byte_weight, "audits.total-byte-weight")?;

    Ok(RawLighthouseReport {
        form_factor: require(settings.form_factor, "configSettings.formFactor")?,
        performance: require(categories.performance, "categories.performance")?.score,
        accessibility: require(categories.accessibility, "categories.accessibility")?.score,
        best_practices: require(categories.best_practices, "categories.best-practices")?.score,
        seo: require(categories.seo, "categories.seo")?.score,
        largest_contentful_paint: require(
            lcp.numeric_value,
            "audits.largest-contentful-paint.numericValue",
        )?,
        total_byte_weight: require(
            byte_weight.numeric_value,
            "audits.total-byte-weight.numericValue",
        )?,
    })
}

/// Validates a raw webpack stats document into a [`RawWebpackStats`].
///
/// A missing `assets` array is treated as an empty bundle; a missing `time`
/// is a malformed document.
pub fn parse_webpack_stats(bytes: &[u8]) -> Result<RawWebpackStats> {
    let doc: WebpackDoc =
        serde_json::from_slice(bytes).context("webpack stats document is not valid JSON")?;

    Ok(RawWebpackStats {
        time: require(doc.time, "time")?,
        assets: doc.assets,
    })
}
