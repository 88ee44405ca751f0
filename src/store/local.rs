//! Filesystem-backed blob store for the local access mode and tests.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::{BlobStore, Consistency};
use crate::error::AnalyticsError;

/// Blob store rooted at a local directory, one subdirectory per partition.
///
/// Listing order matches the S3 backend (lexicographic). Reads from disk are
/// trivially strong; the [`Consistency`] argument is accepted for contract
/// parity.
pub struct LocalStore {
    root: PathBuf,
    name: String,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            name: format!("dir://{}", root.display()),
            root,
        }
    }
}

#[async_trait]
impl BlobStore for LocalStore {
    async fn list_partitions(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut partitions = Vec::new();
        for entry in fs::read_dir(&self.root).context("reading store root")? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let dir_name = entry.file_name().into_string().map_err(|name| {
                AnalyticsError::StoreList(format!("non-UTF-8 partition name: {name:?}"))
            })?;
            partitions.push(dir_name);
        }
        partitions.sort();
        Ok(partitions)
    }

    async fn get_json(&self, key: &str, _consistency: Consistency) -> Result<Value> {
        let path = self.root.join(key);
        let bytes =
            fs::read(&path).with_context(|| format!("reading '{}'", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("object '{key}' is not valid JSON"))
    }

    async fn put_json(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating partition directory for '{key}'"))?;
        }
        fs::write(&path, serde_json::to_vec(value)?)
            .with_context(|| format!("writing '{}'", path.display()))?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
