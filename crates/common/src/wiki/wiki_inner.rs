use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use object_store::{KeyValueStore, ListMode};
use serde::{Deserialize, Serialize};

use crate::auth::{owned_prefix, require_authorized};
use crate::identity::Principal;

use super::batch::{self, BatchOpKind, BatchOperation, BatchReport};
use super::error::WikiError;
use super::listing::{self, entries_from_listing, ListingEntry};
use super::path::{marker_key, normalize_dir, resolve_type, validate_file_path, validate_path, PathType};
use super::tree_ops::{self, SubtreeReport};

/// Content type for pages whose extension says nothing better.
pub const DEFAULT_CONTENT_TYPE: &str = "text/markdown";

/// Written to `users/<id>/welcome.md` the first time a principal's tree is
/// initialized.
pub const WELCOME_PAGE: &str = "# Welcome\n\n\
This is your own wiki space. From here you can:\n\n\
- create pages and folders\n\
- write in Markdown\n\
- move, copy and reorganize whole folders\n\n\
## Getting started\n\n\
Create a page next to this one, or a folder to group related pages.\n";

const WELCOME_PAGE_NAME: &str = "welcome.md";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub path: String,
    pub content: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Stat {
    File {
        path: String,
        size: u64,
        last_modified: DateTime<Utc>,
    },
    Directory {
        path: String,
        file_count: usize,
        folder_count: usize,
        total_size: u64,
    },
}

/// A principal-aware view of the store.
///
/// Every public operation validates its paths, then checks them against the
/// calling principal, before touching the store.
#[derive(Debug, Clone)]
pub struct Wiki {
    store: Arc<dyn KeyValueStore>,
}

impl Wiki {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    #[tracing::instrument(skip(self, principal), fields(principal = %principal.id))]
    pub async fn list_children(
        &self,
        principal: &Principal,
        prefix: &str,
    ) -> Result<Vec<ListingEntry>, WikiError> {
        let prefix = normalize_dir(prefix);
        validate_path(&prefix)?;
        require_authorized(principal, &prefix)?;

        Ok(listing::list_children(self.store.as_ref(), &prefix).await?)
    }

    #[tracing::instrument(skip(self, principal), fields(principal = %principal.id))]
    pub async fn get_file(&self, principal: &Principal, path: &str) -> Result<FileContent, WikiError> {
        validate_file_path(path)?;
        require_authorized(principal, path)?;

        let object = self
            .store
            .get(path)
            .await?
            .ok_or_else(|| WikiError::NotFound(path.to_string()))?;

        Ok(FileContent {
            path: path.to_string(),
            content: String::from_utf8_lossy(&object.data).into_owned(),
            size: object.info.size,
            last_modified: object.info.last_modified,
        })
    }

    /// Create or overwrite a page. The content type is guessed from the
    /// extension.
    #[tracing::instrument(skip(self, principal, content), fields(principal = %principal.id, len = content.len()))]
    pub async fn put_file(
        &self,
        principal: &Principal,
        path: &str,
        content: &str,
    ) -> Result<(), WikiError> {
        validate_file_path(path)?;
        require_authorized(principal, path)?;

        let content_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or(DEFAULT_CONTENT_TYPE);
        self.store
            .put(path, Bytes::copy_from_slice(content.as_bytes()), content_type)
            .await?;
        Ok(())
    }

    /// Delete one page. Deleting an absent page succeeds.
    #[tracing::instrument(skip(self, principal), fields(principal = %principal.id))]
    pub async fn delete_file(&self, principal: &Principal, path: &str) -> Result<(), WikiError> {
        validate_file_path(path)?;
        require_authorized(principal, path)?;

        Ok(tree_ops::delete_file(self.store.as_ref(), path).await?)
    }

    #[tracing::instrument(skip(self, principal), fields(principal = %principal.id))]
    pub async fn delete_subtree(
        &self,
        principal: &Principal,
        prefix: &str,
    ) -> Result<SubtreeReport, WikiError> {
        let prefix = normalize_dir(prefix);
        validate_path(&prefix)?;
        require_authorized(principal, &prefix)?;

        Ok(tree_ops::delete_subtree(self.store.as_ref(), &prefix).await?)
    }

    #[tracing::instrument(skip(self, principal), fields(principal = %principal.id))]
    pub async fn copy(
        &self,
        principal: &Principal,
        src: &str,
        dst: &str,
        is_directory: bool,
    ) -> Result<SubtreeReport, WikiError> {
        self.transfer(principal, BatchOpKind::Copy, src, dst, is_directory)
            .await
    }

    #[tracing::instrument(skip(self, principal), fields(principal = %principal.id))]
    pub async fn mv(
        &self,
        principal: &Principal,
        src: &str,
        dst: &str,
        is_directory: bool,
    ) -> Result<SubtreeReport, WikiError> {
        self.transfer(principal, BatchOpKind::Move, src, dst, is_directory)
            .await
    }

    /// Run a batch. Every path in every slot is authorized first; a single
    /// denied path rejects the whole batch before anything runs. After that,
    /// each slot succeeds or fails on its own.
    #[tracing::instrument(skip(self, principal, operations), fields(principal = %principal.id, ops = operations.len()))]
    pub async fn run_batch(
        &self,
        principal: &Principal,
        operations: Vec<BatchOperation>,
    ) -> Result<BatchReport, WikiError> {
        for op in &operations {
            for path in op.paths() {
                if op.is_directory {
                    require_authorized(principal, &normalize_dir(path))?;
                } else {
                    require_authorized(principal, path)?;
                }
            }
        }

        let report = batch::run_batch(operations, |op| self.apply(principal, op)).await;
        tracing::info!(
            total = report.total_operations,
            failed = report.failure_count,
            "batch finished"
        );
        Ok(report)
    }

    /// Existence and size information for a file or a directory.
    #[tracing::instrument(skip(self, principal), fields(principal = %principal.id))]
    pub async fn stat(&self, principal: &Principal, path: &str) -> Result<Stat, WikiError> {
        validate_path(path)?;
        require_authorized(principal, path)?;

        match resolve_type(path) {
            PathType::File => {
                let info = self
                    .store
                    .head(path)
                    .await?
                    .ok_or_else(|| WikiError::NotFound(path.to_string()))?;
                Ok(Stat::File {
                    path: path.to_string(),
                    size: info.size,
                    last_modified: info.last_modified,
                })
            }
            PathType::Directory => {
                let dir = normalize_dir(path);
                let listing = self.store.list(&dir, ListMode::Delimited).await?;
                if listing.is_empty() {
                    return Err(WikiError::NotFound(dir));
                }

                let total_size = listing.items.iter().map(|item| item.size).sum();
                let entries = entries_from_listing(&dir, listing);
                let file_count = entries.iter().filter(|e| e.is_file).count();
                Ok(Stat::Directory {
                    path: dir,
                    file_count,
                    folder_count: entries.len() - file_count,
                    total_size,
                })
            }
        }
    }

    /// Make a directory listable by writing its marker. Returns the marker
    /// key.
    #[tracing::instrument(skip(self, principal), fields(principal = %principal.id))]
    pub async fn create_folder(&self, principal: &Principal, path: &str) -> Result<String, WikiError> {
        let dir = normalize_dir(path);
        validate_path(&dir)?;
        require_authorized(principal, &dir)?;

        let marker = marker_key(&dir);
        self.store.put(&marker, Bytes::new(), "text/plain").await?;
        Ok(marker)
    }

    /// Seed an empty tree with a welcome page. Returns `false` if the
    /// principal already had content.
    #[tracing::instrument(skip(self, principal), fields(principal = %principal.id))]
    pub async fn init_user_directory(&self, principal: &Principal) -> Result<bool, WikiError> {
        let root = owned_prefix(&principal.id);
        require_authorized(principal, &root)?;

        let existing = self.store.list(&root, ListMode::Delimited).await?;
        if !existing.is_empty() {
            return Ok(false);
        }

        let welcome = format!("{}{}", root, WELCOME_PAGE_NAME);
        self.store
            .put(&welcome, Bytes::from_static(WELCOME_PAGE.as_bytes()), DEFAULT_CONTENT_TYPE)
            .await?;
        tracing::info!(key = %welcome, "initialized user directory");
        Ok(true)
    }

    async fn transfer(
        &self,
        principal: &Principal,
        kind: BatchOpKind,
        src: &str,
        dst: &str,
        is_directory: bool,
    ) -> Result<SubtreeReport, WikiError> {
        let (src, dst) = prepare_transfer(src, dst, is_directory)?;
        require_authorized(principal, &src)?;
        require_authorized(principal, &dst)?;
        self.run_transfer(kind, &src, &dst, is_directory).await
    }

    /// Execute an already authorized transfer.
    async fn run_transfer(
        &self,
        kind: BatchOpKind,
        src: &str,
        dst: &str,
        is_directory: bool,
    ) -> Result<SubtreeReport, WikiError> {
        let store = self.store.as_ref();
        match (kind, is_directory) {
            (BatchOpKind::Copy, true) => Ok(tree_ops::copy_subtree(store, src, dst).await?),
            (BatchOpKind::Move, true) => Ok(tree_ops::move_subtree(store, src, dst).await?),
            (BatchOpKind::Copy, false) => {
                require_exists(store, src).await?;
                tree_ops::copy_file(store, src, dst).await?;
                Ok(SubtreeReport::single())
            }
            (BatchOpKind::Move, false) => {
                require_exists(store, src).await?;
                tree_ops::move_file(store, src, dst).await?;
                Ok(SubtreeReport::single())
            }
            (BatchOpKind::Delete, _) => Err(WikiError::validation("delete is not a transfer")),
        }
    }

    /// One batch slot. Paths were authorized up front by [`Self::run_batch`].
    async fn apply(&self, principal: &Principal, op: BatchOperation) -> Result<SubtreeReport, WikiError> {
        let destination = op.destination()?;

        match (op.kind, destination) {
            (BatchOpKind::Delete, _) if op.is_directory => {
                self.delete_subtree(principal, &op.source_path).await
            }
            (BatchOpKind::Delete, _) => {
                self.delete_file(principal, &op.source_path).await?;
                Ok(SubtreeReport::single())
            }
            (kind, Some(dst)) => {
                let (src, dst) = prepare_transfer(&op.source_path, dst, op.is_directory)?;
                self.run_transfer(kind, &src, &dst, op.is_directory).await
            }
            (_, None) => Err(WikiError::validation("missing destination path")),
        }
    }
}

/// Validate and normalize a copy/move pair. Directories get their trailing
/// `/`; a directory may not land inside itself and a file may not land on
/// itself.
fn prepare_transfer(src: &str, dst: &str, is_directory: bool) -> Result<(String, String), WikiError> {
    if is_directory {
        let src = normalize_dir(src);
        let dst = normalize_dir(dst);
        validate_path(&src)?;
        validate_path(&dst)?;
        // nested trees overlap: target keys would land on source keys
        if dst.starts_with(&src) || src.starts_with(&dst) {
            return Err(WikiError::validation(format!(
                "source '{}' and destination '{}' overlap",
                src, dst
            )));
        }
        Ok((src, dst))
    } else {
        validate_file_path(src)?;
        validate_file_path(dst)?;
        if src == dst {
            return Err(WikiError::validation(format!(
                "source and destination are the same: {}",
                src
            )));
        }
        Ok((src.to_string(), dst.to_string()))
    }
}

async fn require_exists(store: &dyn KeyValueStore, key: &str) -> Result<(), WikiError> {
    match store.head(key).await? {
        Some(_) => Ok(()),
        None => Err(WikiError::NotFound(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use object_store::Storage;

    use super::*;
    use crate::identity::TokenStore;

    fn wiki() -> (Wiki, Principal) {
        let tokens = TokenStore::new();
        let alice = tokens.issue_token("alice", None).unwrap();
        (Wiki::new(Arc::new(Storage::memory())), alice)
    }

    #[test]
    fn test_prepare_transfer() {
        let (src, dst) = prepare_transfer("users/a/x", "users/a/y", true).unwrap();
        assert_eq!(src, "users/a/x/");
        assert_eq!(dst, "users/a/y/");

        // sibling sharing a string prefix is not "inside"
        assert!(prepare_transfer("users/a/x", "users/a/xy", true).is_ok());

        assert!(prepare_transfer("users/a/x/", "users/a/x/", true).is_err());
        assert!(prepare_transfer("users/a/x/", "users/a/x/y/", true).is_err());
        assert!(prepare_transfer("users/a/x.md", "users/a/x.md", false).is_err());
        assert!(prepare_transfer("users/a/x.md", "users/a/dir/", false).is_err());
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let (wiki, alice) = wiki();
        wiki.put_file(&alice, "users/alice/a.md", "# A").await.unwrap();

        let file = wiki.get_file(&alice, "users/alice/a.md").await.unwrap();
        assert_eq!(file.content, "# A");
        assert_eq!(file.size, 3);
    }

    #[tokio::test]
    async fn test_get_missing_file() {
        let (wiki, alice) = wiki();
        assert!(matches!(
            wiki.get_file(&alice, "users/alice/nope.md").await,
            Err(WikiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_validation_runs_before_authorization() {
        let (wiki, alice) = wiki();
        assert!(matches!(
            wiki.get_file(&alice, "users/bob/../alice/a.md").await,
            Err(WikiError::Validation(_))
        ));
        assert!(matches!(
            wiki.get_file(&alice, "users/bob/a.md").await,
            Err(WikiError::AccessDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_create_folder_lists_empty() {
        let (wiki, alice) = wiki();
        let marker = wiki.create_folder(&alice, "users/alice/empty").await.unwrap();
        assert_eq!(marker, "users/alice/empty/.keep");

        let root = wiki.list_children(&alice, "users/alice/").await.unwrap();
        assert_eq!(root.len(), 1);
        assert_eq!(root[0].name, "empty");
        assert!(!root[0].is_file);

        assert!(wiki
            .list_children(&alice, "users/alice/empty/")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_init_user_directory_once() {
        let (wiki, alice) = wiki();
        assert!(wiki.init_user_directory(&alice).await.unwrap());
        assert!(!wiki.init_user_directory(&alice).await.unwrap());

        let page = wiki.get_file(&alice, "users/alice/welcome.md").await.unwrap();
        assert_eq!(page.content, WELCOME_PAGE);
    }
}
