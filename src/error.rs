//! Error taxonomy for the analytics pipeline.
//!
//! Failures that corrupt the whole dataset (malformed audit input, a report
//! without a timestamp, a malformed store listing) are fatal. Failures scoped
//! to one partition are wrapped in [`AnalyticsError::PartitionFetch`] and
//! degraded to a null entry by the aggregator instead of propagating.

use thiserror::Error;

/// Errors raised while building, storing, or aggregating analytics reports.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// A raw audit document lacks a required nested field.
    #[error("malformed audit document: missing field `{path}`")]
    MalformedInput { path: String },

    /// A report reached the upload step without a `time` value.
    #[error("analytics report has no `time`; cannot derive its partition key")]
    MissingTimestamp,

    /// The blob store returned a listing that is not well-formed.
    #[error("malformed partition listing from blob store: {0}")]
    StoreList(String),

    /// A single partition could not be fetched or parsed.
    #[error("failed to fetch partition `{key}`: {reason}")]
    PartitionFetch { key: String, reason: String },
}
