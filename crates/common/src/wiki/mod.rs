//! Virtual page trees over a flat key store
//!
//! The store only knows keys. Everything that looks like a filesystem is
//! emulated here:
//!
//! - **Directories** exist implicitly while any key shares their prefix.
//!   An otherwise empty directory is kept alive by a zero-byte
//!   [`DIRECTORY_MARKER`] object, which listings hide.
//! - **[`Wiki`]**: the entry point. Validates paths, checks them against the
//!   calling [`Principal`](crate::identity::Principal), then runs the
//!   operation.
//! - **Subtree operations** ([`tree_ops`]) fan a directory copy, move or
//!   delete out into per-key store calls and report per-key failures in a
//!   [`SubtreeReport`].
//! - **Batches** ([`BatchOperation`]) run several operations in order, each
//!   slot succeeding or failing on its own.
//!
//! # Path forms
//!
//! Paths are full keys such as `users/alice/notes/todo.md`. A trailing `/`
//! marks a directory (`users/alice/notes/`). Leading slashes, empty segments
//! and `.`/`..` segments are rejected before any authorization check runs.

mod batch;
mod error;
mod listing;
mod path;
pub mod tree_ops;
mod wiki_inner;

pub use batch::{run_batch, BatchOpKind, BatchOperation, BatchReport, BatchResult};
pub use error::WikiError;
pub use listing::{entries_from_listing, list_children, ListingEntry};
pub use path::{
    normalize_dir, resolve_type, validate_file_path, validate_path, PathType, DIRECTORY_MARKER,
};
pub use tree_ops::{KeyFailure, SubtreeReport, COPY_CONCURRENCY};
pub use wiki_inner::{FileContent, Stat, Wiki, DEFAULT_CONTENT_TYPE, WELCOME_PAGE};
