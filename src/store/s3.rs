//! S3-backed blob store, one directory-style prefix per partition.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::{BlobStore, Consistency};
use crate::error::AnalyticsError;

/// Blob store backed by an S3 bucket.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    name: String,
}

impl S3Store {
    /// Creates a store using the ambient AWS configuration (env vars,
    /// profile, instance role) already loaded by `aws_config`.
    pub fn new(config: &aws_config::SdkConfig, bucket: String) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(config),
            name: format!("s3://{bucket}"),
            bucket,
        }
    }
}

#[async_trait]
impl BlobStore for S3Store {
    /// Lists partition directories via the delimiter form of ListObjectsV2;
    /// each common prefix is one timestamp partition. A listing entry without
    /// a prefix string is a malformed backend response and fails the whole
    /// call.
    async fn list_partitions(&self) -> Result<Vec<String>> {
        let resp = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .delimiter("/")
            .send()
            .await
            .context("S3 ListObjectsV2 failed")?;

        let mut partitions = Vec::new();
        for common_prefix in resp.common_prefixes() {
            let dir = common_prefix.prefix().ok_or_else(|| {
                AnalyticsError::StoreList("listing entry without a prefix".to_string())
            })?;
            partitions.push(dir.trim_end_matches('/').to_string());
        }
        Ok(partitions)
    }

    /// S3 reads are strongly consistent, so both [`Consistency`] levels are
    /// served identically by this backend.
    async fn get_json(&self, key: &str, _consistency: Consistency) -> Result<Value> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("S3 GetObject failed for '{key}'"))?;

        let body = resp
            .body
            .collect()
            .await
            .with_context(|| format!("reading S3 object body for '{key}'"))?
            .into_bytes();

        serde_json::from_slice(&body).with_context(|| format!("object '{key}' is not valid JSON"))
    }

    async fn put_json(&self, key: &str, value: &Value) -> Result<()> {
        let body = serde_json::to_vec(value)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body.into())
            .content_type("application/json")
            .send()
            .await
            .with_context(|| format!("S3 PutObject failed for '{key}'"))?;

        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
