//! # Principals and tokens
//!
//! A principal is a user of the wiki: an id, an optional email and a bearer
//! secret. The [`TokenStore`] keeps them in memory, keyed both by id and by
//! secret so that request authentication is a single lookup.
//!
//! Secrets are 64 hex characters drawn from 32 random bytes. Anyone holding
//! a principal's secret acts as that principal; rotation replaces it
//! atomically.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

const SECRET_BYTES: usize = 32;

/// Accounts seeded in development mode.
pub const DEMO_PRINCIPALS: [(&str, &str); 3] = [
    ("demo", "demo@example.com"),
    ("alice", "alice@example.com"),
    ("bob", "bob@example.com"),
];

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub secret_key: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    pub is_active: bool,
}

// keep secrets out of logs
impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("secret_key", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("last_used", &self.last_used)
            .field("is_active", &self.is_active)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("principal already exists: {0}")]
    AlreadyExists(String),
    #[error("principal not found: {0}")]
    NotFound(String),
    #[error("invalid principal id: {0:?}")]
    InvalidId(String),
}

#[derive(Debug, Default)]
struct Registry {
    principals: HashMap<String, Principal>,
    by_secret: HashMap<String, String>,
}

/// In-memory principal registry.
///
/// Cheap to clone; clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct TokenStore(Arc<RwLock<Registry>>);

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a principal with a fresh secret.
    pub fn issue_token(
        &self,
        principal_id: &str,
        email: Option<String>,
    ) -> Result<Principal, IdentityError> {
        validate_id(principal_id)?;

        let mut registry = self.0.write();
        if registry.principals.contains_key(principal_id) {
            return Err(IdentityError::AlreadyExists(principal_id.to_string()));
        }

        let principal = Principal {
            id: principal_id.to_string(),
            email,
            secret_key: generate_secret(),
            created_at: Utc::now(),
            last_used: None,
            is_active: true,
        };
        registry
            .by_secret
            .insert(principal.secret_key.clone(), principal.id.clone());
        registry
            .principals
            .insert(principal.id.clone(), principal.clone());

        tracing::info!(principal = %principal.id, "issued token");
        Ok(principal)
    }

    /// Replace a principal's secret, returning the new one. The previous
    /// secret stops resolving immediately.
    pub fn rotate_token(&self, principal_id: &str) -> Result<String, IdentityError> {
        let mut registry = self.0.write();
        let Registry {
            principals,
            by_secret,
        } = &mut *registry;

        let principal = principals
            .get_mut(principal_id)
            .ok_or_else(|| IdentityError::NotFound(principal_id.to_string()))?;

        by_secret.remove(&principal.secret_key);
        principal.secret_key = generate_secret();
        by_secret.insert(principal.secret_key.clone(), principal.id.clone());

        tracing::info!(principal = %principal.id, "rotated token");
        Ok(principal.secret_key.clone())
    }

    /// Look up the active principal holding `secret`, stamping `last_used`.
    pub fn resolve(&self, secret: &str) -> Option<Principal> {
        let mut registry = self.0.write();
        let Registry {
            principals,
            by_secret,
        } = &mut *registry;

        let id = by_secret.get(secret)?;
        let principal = principals.get_mut(id)?;
        if !principal.is_active {
            return None;
        }
        principal.last_used = Some(Utc::now());
        Some(principal.clone())
    }

    pub fn get(&self, principal_id: &str) -> Option<Principal> {
        self.0.read().principals.get(principal_id).cloned()
    }

    /// Mark a principal inactive. Its secret stays registered but no longer
    /// resolves.
    pub fn deactivate(&self, principal_id: &str) -> Result<(), IdentityError> {
        let mut registry = self.0.write();
        let principal = registry
            .principals
            .get_mut(principal_id)
            .ok_or_else(|| IdentityError::NotFound(principal_id.to_string()))?;
        principal.is_active = false;
        tracing::info!(principal = %principal_id, "deactivated principal");
        Ok(())
    }

    /// All principals, ordered by id.
    pub fn list(&self) -> Vec<Principal> {
        let registry = self.0.read();
        let mut principals: Vec<Principal> = registry.principals.values().cloned().collect();
        principals.sort_by(|a, b| a.id.cmp(&b.id));
        principals
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().principals.is_empty()
    }

    /// Seed the demo accounts into an empty store. Returns what was created;
    /// a non-empty store is left untouched.
    pub fn seed_demo_principals(&self) -> Vec<Principal> {
        if !self.is_empty() {
            return Vec::new();
        }
        DEMO_PRINCIPALS
            .iter()
            .filter_map(|(id, email)| self.issue_token(id, Some(email.to_string())).ok())
            .collect()
    }
}

fn generate_secret() -> String {
    let bytes: [u8; SECRET_BYTES] = rand::random();
    hex::encode(bytes)
}

/// Ids become a single key segment, so they may not contain `/` or be a
/// relative segment.
fn validate_id(id: &str) -> Result<(), IdentityError> {
    let valid = !id.is_empty()
        && id != "."
        && id != ".."
        && !id
            .chars()
            .any(|c| c == '/' || c.is_whitespace() || c.is_control());
    if valid {
        Ok(())
    } else {
        Err(IdentityError::InvalidId(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_resolve() {
        let tokens = TokenStore::new();
        let alice = tokens
            .issue_token("alice", Some("alice@example.com".to_string()))
            .unwrap();

        assert_eq!(alice.secret_key.len(), 64);
        assert!(alice.secret_key.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(alice.is_active);
        assert!(alice.last_used.is_none());

        let resolved = tokens.resolve(&alice.secret_key).unwrap();
        assert_eq!(resolved.id, "alice");
        assert!(resolved.last_used.is_some());
        assert!(tokens.get("alice").unwrap().last_used.is_some());
    }

    #[test]
    fn test_issue_duplicate() {
        let tokens = TokenStore::new();
        tokens.issue_token("alice", None).unwrap();
        assert_eq!(
            tokens.issue_token("alice", None).unwrap_err(),
            IdentityError::AlreadyExists("alice".to_string())
        );
    }

    #[test]
    fn test_invalid_ids() {
        let tokens = TokenStore::new();
        for id in ["", ".", "..", "a/b", "with space", "tab\there"] {
            assert_eq!(
                tokens.issue_token(id, None).unwrap_err(),
                IdentityError::InvalidId(id.to_string())
            );
        }
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_secrets_are_distinct() {
        let tokens = TokenStore::new();
        let a = tokens.issue_token("a", None).unwrap();
        let b = tokens.issue_token("b", None).unwrap();
        assert_ne!(a.secret_key, b.secret_key);
    }

    #[test]
    fn test_unknown_secret() {
        let tokens = TokenStore::new();
        tokens.issue_token("alice", None).unwrap();
        assert!(tokens.resolve("not-a-secret").is_none());
        assert!(tokens.resolve("").is_none());
    }

    #[test]
    fn test_rotate_invalidates_old_secret() {
        let tokens = TokenStore::new();
        let before = tokens.issue_token("alice", None).unwrap();
        let secret = tokens.rotate_token("alice").unwrap();

        assert_ne!(before.secret_key, secret);
        assert!(tokens.resolve(&before.secret_key).is_none());
        let after = tokens.resolve(&secret).unwrap();
        assert_eq!(after.id, "alice");
        assert_eq!(before.created_at, after.created_at);
    }

    #[test]
    fn test_rotate_unknown() {
        let tokens = TokenStore::new();
        assert_eq!(
            tokens.rotate_token("ghost").unwrap_err(),
            IdentityError::NotFound("ghost".to_string())
        );
    }

    #[test]
    fn test_deactivate() {
        let tokens = TokenStore::new();
        let bob = tokens.issue_token("bob", None).unwrap();
        tokens.deactivate("bob").unwrap();

        assert!(tokens.resolve(&bob.secret_key).is_none());
        assert!(!tokens.get("bob").unwrap().is_active);
        assert!(tokens.deactivate("ghost").is_err());
    }

    #[test]
    fn test_seed_demo_principals() {
        let tokens = TokenStore::new();
        let seeded = tokens.seed_demo_principals();
        assert_eq!(seeded.len(), 3);

        let ids: Vec<String> = tokens.list().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["alice", "bob", "demo"]);

        // second call is a no-op
        assert!(tokens.seed_demo_principals().is_empty());
        assert_eq!(tokens.list().len(), 3);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let tokens = TokenStore::new();
        let alice = tokens.issue_token("alice", None).unwrap();
        let debug = format!("{:?}", alice);
        assert!(!debug.contains(&alice.secret_key));
        assert!(debug.contains("<redacted>"));
    }
}
