//! Flat Key-Value Object Store Adapter
//!
//! This crate wraps a backing object store (S3/MinIO/local filesystem/memory)
//! behind the [`KeyValueStore`] trait: per-key get, head, put, delete, batched
//! delete, prefix listing (with or without a `/` delimiter) and server-side copy.
//!
//! Keys are plain slash-delimited strings. The store has no notion of a
//! directory; callers emulate one with [`ListMode::Delimited`] listings.
//!
//! Nothing in here retries. Transient failures surface as [`StoreError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use quire_object_store::{KeyValueStore, ListMode, ObjectStoreConfig, Storage};
//!
//! # async fn example() -> Result<(), quire_object_store::StoreError> {
//! let store = Storage::new(ObjectStoreConfig::Memory).await?;
//! store
//!     .put("users/alice/todo.md", "# todo".into(), "text/markdown")
//!     .await?;
//!
//! let listing = store.list("users/alice/", ListMode::Delimited).await?;
//! assert_eq!(listing.items.len(), 1);
//! # Ok(())
//! # }
//! ```

mod error;
mod storage;
mod store;

pub use error::{Result, StoreError};
pub use storage::{ObjectStoreConfig, Storage};
pub use store::{
    KeyValueStore, ListMode, Listing, ObjectInfo, RejectedKey, StoredObject, MAX_DELETE_BATCH,
};
