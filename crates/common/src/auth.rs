//! # Path authorization
//!
//! Every principal owns exactly one key prefix, `users/<id>/`. There is no
//! shared or public namespace: anything outside that prefix is denied, and an
//! inactive principal is denied everywhere.

use crate::identity::Principal;

/// Root under which every principal's prefix lives.
pub const USERS_ROOT: &str = "users/";

/// The key prefix owned by `principal_id`.
pub fn owned_prefix(principal_id: &str) -> String {
    format!("{}{}/", USERS_ROOT, principal_id)
}

/// Raised when a principal reaches outside its own prefix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("access denied: '{principal}' may not access '{path}'")]
pub struct AccessDenied {
    pub principal: String,
    pub path: String,
}

/// Whether `principal` may read or write `path`.
pub fn authorize(principal: &Principal, path: &str) -> bool {
    principal.is_active
        && path.starts_with(&owned_prefix(&principal.id))
        && !path.split('/').any(|segment| segment == "..")
}

/// Like [`authorize`], but fails with [`AccessDenied`].
pub fn require_authorized(principal: &Principal, path: &str) -> Result<(), AccessDenied> {
    if authorize(principal, path) {
        Ok(())
    } else {
        tracing::debug!(principal = %principal.id, path, "path access denied");
        Err(AccessDenied {
            principal: principal.id.clone(),
            path: path.to_string(),
        })
    }
}
