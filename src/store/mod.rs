//! Blob store abstraction: timestamp-partitioned JSON documents.
//!
//! [`BlobStore`] is the contract both pipeline stages talk through: the
//! builder writes one report per partition, the aggregator lists partitions
//! and reads them back. [`S3Store`] implements it against a bucket and
//! [`LocalStore`] against a directory on disk.

pub mod local;
pub mod s3;

pub use local::LocalStore;
pub use s3::S3Store;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::error::AnalyticsError;
use crate::report::types::AnalyticsReport;

/// Key of the single report object inside each partition directory.
pub const PARTITION_OBJECT: &str = "analytics.json";

/// Read-freshness level for store gets.
///
/// `Eventual` may serve slightly stale data shortly after a write and is the
/// default on the read path, trading recency for latency. Callers needing
/// read-after-write freshness request `Strong` explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Consistency {
    #[default]
    Eventual,
    Strong,
}

/// Builds the object key for a partition's report.
pub fn partition_key(timestamp: &str) -> String {
    format!("{timestamp}/{PARTITION_OBJECT}")
}

/// A key-value blob store holding one serialized report per timestamp
/// partition. List, get, and put only; reports are append-only and nothing
/// here updates or deletes them.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Lists top-level partition directory names, trailing path separators
    /// stripped, in the order the backend returns them.
    async fn list_partitions(&self) -> Result<Vec<String>>;

    /// Fetches and parses the JSON object at `key`. Errors on a missing key
    /// or content that is not valid JSON.
    async fn get_json(&self, key: &str, consistency: Consistency) -> Result<Value>;

    /// Writes `value` serialized as JSON at `key`.
    async fn put_json(&self, key: &str, value: &Value) -> Result<()>;

    /// Human-readable store name, echoed in the HTTP response envelope.
    fn name(&self) -> &str;
}

/// Uploads a report under its timestamp partition key and returns that key.
///
/// Fails with [`AnalyticsError::MissingTimestamp`] before touching the store
/// when the report carries no `time`: every stored partition must be
/// addressable by its timestamp.
pub async fn upload_report(store: &dyn BlobStore, report: &AnalyticsReport) -> Result<String> {
    let time = report
        .time
        .as_deref()
        .ok_or(AnalyticsError::MissingTimestamp)?;

    let key = partition_key(time);
    store.put_json(&key, &serde_json::to_value(report)?).await?;
    Ok(key)
}
