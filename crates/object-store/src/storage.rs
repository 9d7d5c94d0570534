//! Object storage backend (S3/MinIO/local filesystem/memory).

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectMeta, ObjectStore, PutOptions};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::store::{
    KeyValueStore, ListMode, Listing, ObjectInfo, RejectedKey, StoredObject, MAX_DELETE_BATCH,
};

/// Configuration for the object storage backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectStoreConfig {
    /// In-memory storage (for testing)
    #[default]
    Memory,

    /// Local filesystem storage
    Local {
        /// Path to the storage directory
        path: PathBuf,
    },

    /// S3-compatible storage (AWS S3, MinIO, etc.)
    S3 {
        /// S3 endpoint URL (e.g., "http://localhost:9000" for MinIO)
        endpoint: String,
        /// Access key ID
        access_key: String,
        /// Secret access key
        secret_key: String,
        /// Bucket name
        bucket: String,
        /// Optional region (defaults to "us-east-1")
        region: Option<String>,
    },
}

/// Wrapper around different object storage backends.
#[derive(Debug, Clone)]
pub struct Storage {
    inner: Arc<dyn ObjectStore>,
    // the local filesystem backend rejects object attributes
    content_types: bool,
}

impl Storage {
    /// Create a new storage backend from configuration.
    pub async fn new(config: ObjectStoreConfig) -> Result<Self> {
        let (inner, content_types): (Arc<dyn ObjectStore>, bool) = match &config {
            ObjectStoreConfig::Memory => (Arc::new(InMemory::new()), true),

            ObjectStoreConfig::Local { path } => {
                // Ensure directory exists
                tokio::fs::create_dir_all(path).await?;
                let store = LocalFileSystem::new_with_prefix(path)
                    .map_err(|e| StoreError::InvalidConfig(e.to_string()))?;
                (Arc::new(store), false)
            }

            ObjectStoreConfig::S3 {
                endpoint,
                access_key,
                secret_key,
                bucket,
                region,
            } => {
                let builder = AmazonS3Builder::new()
                    .with_endpoint(endpoint)
                    .with_access_key_id(access_key)
                    .with_secret_access_key(secret_key)
                    .with_bucket_name(bucket)
                    .with_region(region.as_deref().unwrap_or("us-east-1"))
                    .with_allow_http(endpoint.starts_with("http://"));

                let store: Arc<dyn ObjectStore> = Arc::new(
                    builder
                        .build()
                        .map_err(|e| StoreError::InvalidConfig(e.to_string()))?,
                );

                // Verify bucket exists by listing (empty prefix)
                // This will fail fast if the bucket doesn't exist
                let mut stream = store.list(None);
                match stream.try_next().await {
                    Ok(_) => {}
                    Err(object_store::Error::NotFound { .. }) => {
                        return Err(StoreError::BucketNotFound(bucket.clone()));
                    }
                    Err(e) => {
                        let msg = e.to_string();
                        if msg.contains("NoSuchBucket")
                            || msg.contains("bucket") && msg.contains("not")
                        {
                            return Err(StoreError::BucketNotFound(bucket.clone()));
                        }
                        return Err(e.into());
                    }
                }
                drop(stream);

                (store, true)
            }
        };

        tracing::debug!(?config, "object storage backend ready");
        Ok(Self {
            inner,
            content_types,
        })
    }

    /// Create an in-memory storage backend.
    pub fn memory() -> Self {
        Self {
            inner: Arc::new(InMemory::new()),
            content_types: true,
        }
    }

    fn object_path(key: &str) -> ObjectPath {
        ObjectPath::from(key)
    }

    fn prefix_path(prefix: &str) -> Option<ObjectPath> {
        let trimmed = prefix.trim_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(ObjectPath::from(trimmed))
        }
    }

    /// Undo the per-segment percent-encoding `ObjectPath` applies, so keys
    /// read back from a listing are the keys that were written.
    fn raw_key(location: &str) -> String {
        match urlencoding::decode(location) {
            Ok(key) => key.into_owned(),
            Err(_) => location.to_string(),
        }
    }

    fn info(meta: &ObjectMeta) -> ObjectInfo {
        ObjectInfo {
            key: Self::raw_key(meta.location.as_ref()),
            size: meta.size as u64,
            last_modified: meta.last_modified,
        }
    }
}

#[async_trait]
impl KeyValueStore for Storage {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>> {
        let path = Self::object_path(key);
        match self.inner.get(&path).await {
            Ok(result) => {
                let info = Self::info(&result.meta);
                let data = result.bytes().await?;
                Ok(Some(StoredObject { data, info }))
            }
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn head(&self, key: &str) -> Result<Option<ObjectInfo>> {
        let path = Self::object_path(key);
        match self.inner.head(&path).await {
            Ok(meta) => Ok(Some(Self::info(&meta))),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        let path = Self::object_path(key);
        let mut attributes = Attributes::new();
        if self.content_types {
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
        }
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };
        self.inner.put_opts(&path, data.into(), opts).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = Self::object_path(key);
        // Ignore NotFound errors - the object may already be deleted
        match self.inner.delete(&path).await {
            Ok(()) => Ok(()),
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_many(&self, keys: &[String]) -> Result<Vec<RejectedKey>> {
        if keys.len() > MAX_DELETE_BATCH {
            return Err(StoreError::BatchTooLarge(keys.len(), MAX_DELETE_BATCH));
        }
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let locations = futures::stream::iter(
            keys.iter()
                .map(|key| Ok(Self::object_path(key)))
                .collect::<Vec<_>>(),
        )
        .boxed();

        let mut deleted = HashSet::new();
        let mut errors = Vec::new();
        let mut results = self.inner.delete_stream(locations);
        while let Some(result) = results.next().await {
            match result {
                Ok(path) => {
                    deleted.insert(path.to_string());
                }
                Err(object_store::Error::NotFound { path, .. }) => {
                    deleted.insert(path);
                }
                Err(e) => errors.push(e.to_string()),
            }
        }

        // Failed deletes don't reliably carry their key, so pair the
        // leftover keys with the error messages in arrival order.
        let mut messages = errors.into_iter();
        let rejected: Vec<RejectedKey> = keys
            .iter()
            .filter(|key| !deleted.contains(Self::object_path(key).as_ref()))
            .map(|key| RejectedKey {
                key: key.clone(),
                message: messages
                    .next()
                    .unwrap_or_else(|| "delete was not acknowledged".to_string()),
            })
            .collect();

        if !rejected.is_empty() {
            tracing::warn!(
                requested = keys.len(),
                rejected = rejected.len(),
                "batched delete partially failed"
            );
        }
        Ok(rejected)
    }

    async fn list(&self, prefix: &str, mode: ListMode) -> Result<Listing> {
        let prefix = Self::prefix_path(prefix);

        let mut listing = match mode {
            ListMode::Delimited => {
                let result = self.inner.list_with_delimiter(prefix.as_ref()).await?;
                Listing {
                    items: result.objects.iter().map(Self::info).collect(),
                    common_prefixes: result
                        .common_prefixes
                        .iter()
                        .map(|p| format!("{}/", Self::raw_key(p.as_ref())))
                        .collect(),
                }
            }
            ListMode::Recursive => {
                let metas: Vec<ObjectMeta> = self.inner.list(prefix.as_ref()).try_collect().await?;
                Listing {
                    items: metas.iter().map(Self::info).collect(),
                    common_prefixes: Vec::new(),
                }
            }
        };

        // Not every backend lists in key order
        listing.items.sort_by(|a, b| a.key.cmp(&b.key));
        listing.common_prefixes.sort();
        Ok(listing)
    }

    async fn copy_key(&self, src: &str, dst: &str) -> Result<()> {
        let from = Self::object_path(src);
        let to = Self::object_path(dst);
        self.inner.copy(&from, &to).await?;
        Ok(())
    }
}
