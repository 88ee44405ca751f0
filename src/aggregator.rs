//! Read-side fan-out: reconstructs the report time series from the store.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::error::AnalyticsError;
use crate::report::types::AnalyticsReport;
use crate::store::{partition_key, BlobStore, Consistency};

/// One partition's outcome: the timestamp key and its report, or `None` when
/// the fetch failed or the stored object did not deserialize.
#[derive(Debug)]
pub struct PartitionEntry {
    pub timestamp: String,
    pub report: Option<AnalyticsReport>,
}

/// Lists every partition and fetches each report concurrently.
///
/// One task per partition, all spawned together and all awaited; a per-key
/// fetch failure degrades that partition to `None` and never aborts the
/// aggregate or its sibling fetches. A malformed listing is fatal for the
/// whole call. An empty store yields an empty list. Entries come back in
/// discovery order, which is not necessarily chronological.
#[tracing::instrument(skip_all, fields(store = store.name()))]
pub async fn aggregate(
    store: Arc<dyn BlobStore>,
    consistency: Consistency,
) -> anyhow::Result<Vec<PartitionEntry>> {
    let partitions = store.list_partitions().await?;

    let mut tasks = Vec::with_capacity(partitions.len());
    for timestamp in partitions {
        let store = store.clone();

        tasks.push(tokio::spawn(async move {
            let key = partition_key(&timestamp);
            let report = match store.get_json(&key, consistency).await {
                Ok(value) => deserialize_report(&timestamp, value),
                Err(e) => {
                    let err = AnalyticsError::PartitionFetch {
                        key,
                        reason: e.to_string(),
                    };
                    warn!(%err, "Partition fetch failed; degrading to null");
                    None
                }
            };
            PartitionEntry { timestamp, report }
        }));
    }

    let mut entries = Vec::with_capacity(tasks.len());
    for task in tasks {
        entries.push(task.await?);
    }
    Ok(entries)
}

fn deserialize_report(timestamp: &str, value: Value) -> Option<AnalyticsReport> {
    match serde_json::from_value(value) {
        Ok(report) => Some(report),
        Err(e) => {
            warn!(timestamp, error = %e, "Stored report does not deserialize; degrading to null");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::{HashMap, HashSet};

    struct FakeStore {
        partitions: Vec<String>,
        objects: HashMap<String, Value>,
        failing: HashSet<String>,
        broken_listing: bool,
    }

    impl FakeStore {
        fn new() -> Self {
            Self {
                partitions: Vec::new(),
                objects: HashMap::new(),
                failing: HashSet::new(),
                broken_listing: false,
            }
        }

        fn with_report(mut self, timestamp: &str) -> Self {
            self.partitions.push(timestamp.to_string());
            self.objects.insert(
                partition_key(timestamp),
                json!({ "time": timestamp, "lighthouseReports": [] }),
            );
            self
        }

        fn with_failing(mut self, timestamp: &str) -> Self {
            self.partitions.push(timestamp.to_string());
            self.failing.insert(partition_key(timestamp));
            self
        }
    }

    #[async_trait]
    impl BlobStore for FakeStore {
        async fn list_partitions(&self) -> Result<Vec<String>> {
            if self.broken_listing {
                return Err(AnalyticsError::StoreList("not a directory listing".to_string()).into());
            }
            Ok(self.partitions.clone())
        }

        async fn get_json(&self, key: &str, _consistency: Consistency) -> Result<Value> {
            if self.failing.contains(key) {
                return Err(anyhow!("backend unavailable"));
            }
            self.objects
                .get(key)
                .cloned()
                .ok_or_else(|| anyhow!("no such key: {key}"))
        }

        async fn put_json(&self, _key: &str, _value: &Value) -> Result<()> {
            unreachable!("aggregation never writes")
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    #[tokio::test]
    async fn test_empty_store_yields_empty_mapping() {
        let entries = aggregate(Arc::new(FakeStore::new()), Consistency::Eventual)
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_partial_failure_degrades_to_null() {
        let store = FakeStore::new()
            .with_report("2026-01-01T00:00:00.000Z")
            .with_failing("2026-02-01T00:00:00.000Z")
            .with_report("2026-03-01T00:00:00.000Z");

        let entries = aggregate(Arc::new(store), Consistency::Eventual)
            .await
            .unwrap();

        assert_eq!(entries.len(), 3);
        assert!(entries[0].report.is_some());
        assert!(entries[1].report.is_none());
        assert!(entries[2].report.is_some());
    }

    #[tokio::test]
    async fn test_entries_keep_discovery_order() {
        let store = FakeStore::new()
            .with_report("2026-03-01T00:00:00.000Z")
            .with_report("2026-01-01T00:00:00.000Z");

        let entries = aggregate(Arc::new(store), Consistency::Strong)
            .await
            .unwrap();

        let timestamps: Vec<&str> = entries.iter().map(|e| e.timestamp.as_str()).collect();
        assert_eq!(
            timestamps,
            vec!["2026-03-01T00:00:00.000Z", "2026-01-01T00:00:00.000Z"]
        );
    }

    #[tokio::test]
    async fn test_undeserializable_report_degrades_to_null() {
        let mut store = FakeStore::new().with_report("2026-01-01T00:00:00.000Z");
        store.objects.insert(
            partition_key("2026-01-01T00:00:00.000Z"),
            json!({ "lighthouseReports": "not an array" }),
        );

        let entries = aggregate(Arc::new(store), Consistency::Eventual)
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].report.is_none());
    }

    #[tokio::test]
    async fn test_malformed_listing_is_fatal() {
        let mut store = FakeStore::new().with_report("2026-01-01T00:00:00.000Z");
        store.broken_listing = true;

        assert!(aggregate(Arc::new(store), Consistency::Eventual)
            .await
            .is_err());
    }
}
