//! Structural operations on files and subtrees.
//!
//! The store has no directory objects and no atomic multi-key operations, so
//! a directory copy is one server-side copy per key and a directory delete
//! is one batched delete per [`MAX_DELETE_BATCH`] keys. Nothing here rolls
//! back: a partially applied operation is reported key by key in a
//! [`SubtreeReport`].
//!
//! Moves are copy-then-delete. If any copy fails the delete phase is
//! skipped, so a failed move leaves the source intact.

use futures::stream::{self, StreamExt};
use object_store::{KeyValueStore, ListMode, RejectedKey, StoreError, MAX_DELETE_BATCH};
use serde::{Deserialize, Serialize};

use super::error::WikiError;
use super::path::normalize_dir;

/// Upper bound on concurrent copies within one subtree copy.
pub const COPY_CONCURRENCY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFailure {
    pub key: String,
    pub message: String,
}

impl From<RejectedKey> for KeyFailure {
    fn from(rejected: RejectedKey) -> Self {
        Self {
            key: rejected.key,
            message: rejected.message,
        }
    }
}

/// Per-key outcome of a subtree operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtreeReport {
    /// Keys the operation enumerated
    pub total_keys: usize,
    /// Keys fully processed
    pub succeeded: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<KeyFailure>,
}

impl SubtreeReport {
    /// Report for an operation on exactly one key that succeeded.
    pub fn single() -> Self {
        Self {
            total_keys: 1,
            succeeded: 1,
            failures: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn an incomplete report into [`WikiError::PartialFailure`].
    pub fn into_result(self) -> Result<Self, WikiError> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(WikiError::PartialFailure {
                failed: self.failures.len(),
                total: self.total_keys,
            })
        }
    }
}

pub async fn delete_file(store: &dyn KeyValueStore, path: &str) -> Result<(), StoreError> {
    store.delete(path).await
}

pub async fn copy_file(store: &dyn KeyValueStore, src: &str, dst: &str) -> Result<(), StoreError> {
    store.copy_key(src, dst).await
}

/// Copy then delete. A failed copy leaves the source untouched.
pub async fn move_file(store: &dyn KeyValueStore, src: &str, dst: &str) -> Result<(), StoreError> {
    store.copy_key(src, dst).await?;
    store.delete(src).await
}

/// Every key under `prefix`, at any depth.
pub async fn enumerate(store: &dyn KeyValueStore, prefix: &str) -> Result<Vec<String>, StoreError> {
    let listing = store.list(prefix, ListMode::Recursive).await?;
    Ok(listing.items.into_iter().map(|item| item.key).collect())
}

/// Delete every key under `prefix`. An empty prefix is a no-op.
pub async fn delete_subtree(
    store: &dyn KeyValueStore,
    prefix: &str,
) -> Result<SubtreeReport, StoreError> {
    let prefix = normalize_dir(prefix);
    let keys = enumerate(store, &prefix).await?;
    if keys.is_empty() {
        tracing::debug!(prefix, "nothing to delete");
        return Ok(SubtreeReport::default());
    }

    let report = delete_keys(store, &keys).await;
    tracing::info!(
        prefix,
        total = report.total_keys,
        succeeded = report.succeeded,
        "deleted subtree"
    );
    Ok(report)
}

/// Copy every key under `src` to the same relative key under `dst`.
pub async fn copy_subtree(
    store: &dyn KeyValueStore,
    src: &str,
    dst: &str,
) -> Result<SubtreeReport, StoreError> {
    let src = normalize_dir(src);
    let dst = normalize_dir(dst);
    let keys = enumerate(store, &src).await?;

    let report = copy_keys(store, &keys, &src, &dst).await;
    tracing::info!(
        src,
        dst,
        total = report.total_keys,
        succeeded = report.succeeded,
        "copied subtree"
    );
    Ok(report)
}

/// Copy the subtree, then delete the source keys only if every copy
/// succeeded.
pub async fn move_subtree(
    store: &dyn KeyValueStore,
    src: &str,
    dst: &str,
) -> Result<SubtreeReport, StoreError> {
    let src = normalize_dir(src);
    let dst = normalize_dir(dst);
    let keys = enumerate(store, &src).await?;
    if keys.is_empty() {
        return Ok(SubtreeReport::default());
    }

    let copied = copy_keys(store, &keys, &src, &dst).await;
    if !copied.is_complete() {
        tracing::warn!(
            src,
            dst,
            failed = copied.failures.len(),
            "copy phase incomplete, source left in place"
        );
        return Ok(copied);
    }

    let report = delete_keys(store, &keys).await;
    if !report.is_complete() {
        tracing::warn!(
            src,
            dst,
            failed = report.failures.len(),
            "moved subtree but some source keys remain"
        );
    }
    Ok(report)
}

/// Delete `keys` in chunks of at most [`MAX_DELETE_BATCH`]. A chunk whose
/// request fails outright counts every key in it as failed; later chunks
/// still run.
async fn delete_keys(store: &dyn KeyValueStore, keys: &[String]) -> SubtreeReport {
    let mut report = SubtreeReport {
        total_keys: keys.len(),
        ..Default::default()
    };

    for chunk in keys.chunks(MAX_DELETE_BATCH) {
        match store.delete_many(chunk).await {
            Ok(rejected) => {
                report.succeeded += chunk.len() - rejected.len();
                report
                    .failures
                    .extend(rejected.into_iter().map(KeyFailure::from));
            }
            Err(e) => {
                tracing::warn!(error = %e, keys = chunk.len(), "batched delete failed");
                let message = e.to_string();
                report
                    .failures
                    .extend(chunk.iter().map(|key| KeyFailure {
                        key: key.clone(),
                        message: message.clone(),
                    }));
            }
        }
    }

    report
}

async fn copy_keys(
    store: &dyn KeyValueStore,
    keys: &[String],
    src: &str,
    dst: &str,
) -> SubtreeReport {
    let mut report = SubtreeReport {
        total_keys: keys.len(),
        ..Default::default()
    };

    let mut pairs = Vec::with_capacity(keys.len());
    for key in keys {
        match key.strip_prefix(src) {
            Some(relative) => pairs.push((key.clone(), format!("{}{}", dst, relative))),
            None => report.failures.push(KeyFailure {
                key: key.clone(),
                message: format!("key is outside '{}'", src),
            }),
        }
    }

    let results: Vec<(String, Result<(), StoreError>)> = stream::iter(pairs)
        .map(|(from, to)| async move {
            let result = store.copy_key(&from, &to).await;
            (from, result)
        })
        .buffer_unordered(COPY_CONCURRENCY)
        .collect()
        .await;

    for (key, result) in results {
        match result {
            Ok(()) => report.succeeded += 1,
            Err(e) => report.failures.push(KeyFailure {
                key,
                message: e.to_string(),
            }),
        }
    }

    report
}
