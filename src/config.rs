//! Store configuration resolved from the process environment.
//!
//! An explicit value passed into the pipeline stages; nothing here is a
//! module-level singleton.

use std::env;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use tracing::info;

use crate::store::{BlobStore, LocalStore, S3Store};

/// Environment variable naming the S3 bucket for the remote access mode.
pub const BUCKET_VAR: &str = "SITE_ANALYTICS_BUCKET";
/// Environment variable naming the AWS region for the remote access mode.
pub const REGION_VAR: &str = "SITE_ANALYTICS_REGION";
/// Environment variable overriding the local store directory.
pub const STORE_DIR_VAR: &str = "SITE_ANALYTICS_STORE_DIR";

const DEFAULT_STORE_DIR: &str = "./site-analytics-store";

/// Which blob store backend a run binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Remote access mode: an S3 bucket in a region.
    Remote { bucket: String, region: String },
    /// Default access mode: a directory on local disk.
    Local { root: String },
}

impl StoreConfig {
    /// Reads the store binding from the environment. Both remote variables
    /// must be present to select the remote mode; otherwise the local
    /// default binding applies.
    pub fn from_env() -> Self {
        match (env::var(BUCKET_VAR), env::var(REGION_VAR)) {
            (Ok(bucket), Ok(region)) => StoreConfig::Remote { bucket, region },
            _ => StoreConfig::Local {
                root: env::var(STORE_DIR_VAR).unwrap_or_else(|_| DEFAULT_STORE_DIR.to_string()),
            },
        }
    }

    /// Opens the configured store.
    pub async fn open(self) -> Result<Arc<dyn BlobStore>> {
        match self {
            StoreConfig::Remote { bucket, region } => {
                info!(%bucket, %region, "Using S3 blob store");
                let config = aws_config::from_env()
                    .region(Region::new(region))
                    .load()
                    .await;
                Ok(Arc::new(S3Store::new(&config, bucket)))
            }
            StoreConfig::Local { root } => {
                info!(%root, "Using local blob store");
                Ok(Arc::new(LocalStore::new(root)))
            }
        }
    }
}
