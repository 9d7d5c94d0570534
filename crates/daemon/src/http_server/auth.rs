//! Bearer-token authentication for API routes.
//!
//! Handlers that take an [`Authenticated`] argument only run for requests
//! carrying `Authorization: Bearer <secret>` where the secret resolves to an
//! active principal; everything else is rejected with 401.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use common::identity::Principal;

use super::handlers::error_response;
use crate::ServiceState;

/// The principal behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing authorization header")]
    Missing,
    #[error("authorization header must be 'Bearer <token>'")]
    Malformed,
    #[error("invalid or inactive token")]
    Invalid,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        error_response(StatusCode::UNAUTHORIZED, self.to_string())
    }
}

/// Extract the token from an `Authorization` value. The scheme is matched
/// case-insensitively and the value must be exactly two parts.
pub fn bearer_token(value: &str) -> Option<&str> {
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}

#[axum::async_trait]
impl FromRequestParts<ServiceState> for Authenticated {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(AUTHORIZATION).ok_or(AuthError::Missing)?;
        let value = header.to_str().map_err(|_| AuthError::Malformed)?;
        let token = bearer_token(value).ok_or(AuthError::Malformed)?;

        state
            .tokens()
            .resolve(token)
            .map(Authenticated)
            .ok_or(AuthError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(bearer_token("bearer abc123"), Some("abc123"));
        assert_eq!(bearer_token("BEARER   abc123"), Some("abc123"));

        assert_eq!(bearer_token("abc123"), None);
        assert_eq!(bearer_token("Basic abc123"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer abc 123"), None);
        assert_eq!(bearer_token(""), None);
    }
}
