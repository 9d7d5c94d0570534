//! The key-value contract every backend implements.

use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Maximum number of keys accepted by one [`KeyValueStore::delete_many`] call.
/// Matches the S3 `DeleteObjects` limit.
pub const MAX_DELETE_BATCH: usize = 1000;

/// How deep a prefix listing goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Only immediate children; deeper keys are rolled up into
    /// [`Listing::common_prefixes`] using `/` as the delimiter.
    Delimited,
    /// Every key under the prefix, at any depth.
    Recursive,
}

/// Metadata for a single stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// An object's bytes together with its metadata.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub info: ObjectInfo,
}

/// Result of a prefix listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Objects directly matched by the listing, in lexical key order
    pub items: Vec<ObjectInfo>,
    /// Rolled-up child prefixes, each ending in `/`.
    /// Always empty for [`ListMode::Recursive`].
    pub common_prefixes: Vec<String>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.common_prefixes.is_empty()
    }
}

/// A key a batched delete did not remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedKey {
    pub key: String,
    pub message: String,
}

/// Per-key primitives over a flat object store.
///
/// All keys are slash-delimited strings without a leading `/`. Prefixes
/// passed to [`list`](Self::list) are segment aligned: `users/al` does not
/// match `users/alice/notes.md`.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug + 'static {
    /// Fetch an object, `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<StoredObject>>;

    /// Fetch an object's metadata only, `None` if the key is absent.
    async fn head(&self, key: &str) -> Result<Option<ObjectInfo>>;

    /// Write an object, replacing whatever was stored at `key`.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<()>;

    /// Delete an object. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Delete up to [`MAX_DELETE_BATCH`] keys in one request.
    ///
    /// Absent keys count as deleted. Keys the store refused are returned;
    /// an empty vector means every key is gone.
    async fn delete_many(&self, keys: &[String]) -> Result<Vec<RejectedKey>>;

    /// List keys under `prefix` (empty prefix means the whole store).
    async fn list(&self, prefix: &str, mode: ListMode) -> Result<Listing>;

    /// Server-side copy of `src` to `dst`, overwriting `dst`.
    async fn copy_key(&self, src: &str, dst: &str) -> Result<()>;
}
