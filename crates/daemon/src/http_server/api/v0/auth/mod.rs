//! Principal management: registration, key rotation, deactivation.
//!
//! Registration is the only unauthenticated route here, and only when the
//! daemon was started with registration enabled. Every route that names a
//! principal may only be called by that principal.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::identity::{IdentityError, Principal};

use crate::http_server::handlers::error_response;
use crate::ServiceState;

pub mod create;
pub mod deactivate;
pub mod get;
pub mod regenerate;
pub mod verify;

pub use create::{CreateUserRequest, CreateUserResponse};
pub use deactivate::{DeactivateRequest, DeactivateResponse};
pub use get::{GetUserRequest, GetUserResponse};
pub use regenerate::{RegenerateKeyRequest, RegenerateKeyResponse};
pub use verify::{VerifyRequest, VerifyResponse};

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/users", post(create::handler))
        .route("/users/:id", get(get::handler))
        .route("/users/:id/regenerate-key", post(regenerate::handler))
        .route("/users/:id/deactivate", post(deactivate::handler))
        .route("/verify", get(verify::handler))
}

/// A principal as the API shows it. The secret is only present in replies
/// that hand out a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalView {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
}

impl PrincipalView {
    pub fn public(principal: Principal) -> Self {
        Self {
            id: principal.id,
            email: principal.email,
            created_at: principal.created_at,
            last_used: principal.last_used,
            is_active: principal.is_active,
            secret_key: None,
        }
    }

    pub fn with_secret(principal: Principal) -> Self {
        let secret_key = Some(principal.secret_key.clone());
        Self {
            secret_key,
            ..Self::public(principal)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthApiError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("registration is disabled")]
    RegistrationDisabled,
    #[error("principal '{caller}' may not manage '{target}'")]
    NotSelf { caller: String, target: String },
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthApiError::Identity(IdentityError::AlreadyExists(_)) => StatusCode::CONFLICT,
            AuthApiError::Identity(IdentityError::NotFound(_)) => StatusCode::NOT_FOUND,
            AuthApiError::Identity(IdentityError::InvalidId(_)) => StatusCode::BAD_REQUEST,
            AuthApiError::RegistrationDisabled | AuthApiError::NotSelf { .. } => {
                StatusCode::FORBIDDEN
            }
        };
        error_response(status, self.to_string())
    }
}

pub(crate) fn require_self(caller: &Principal, target: &str) -> Result<(), AuthApiError> {
    if caller.id == target {
        Ok(())
    } else {
        tracing::debug!(caller = %caller.id, target = %target, "refused cross-principal request");
        Err(AuthApiError::NotSelf {
            caller: caller.id.clone(),
            target: target.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use common::identity::TokenStore;

    use super::*;

    #[test]
    fn test_public_view_hides_secret() {
        let tokens = TokenStore::new();
        let alice = tokens.issue_token("alice", None).unwrap();
        let secret = alice.secret_key.clone();

        let json = serde_json::to_string(&PrincipalView::public(alice.clone())).unwrap();
        assert!(!json.contains(&secret));
        assert!(!json.contains("secret_key"));

        let view = PrincipalView::with_secret(alice);
        assert_eq!(view.secret_key.as_deref(), Some(secret.as_str()));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AuthApiError::Identity(IdentityError::AlreadyExists("a".to_string())),
                StatusCode::CONFLICT,
            ),
            (
                AuthApiError::Identity(IdentityError::NotFound("a".to_string())),
                StatusCode::NOT_FOUND,
            ),
            (
                AuthApiError::Identity(IdentityError::InvalidId("a/b".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (AuthApiError::RegistrationDisabled, StatusCode::FORBIDDEN),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
