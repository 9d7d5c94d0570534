use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use super::{require_self, AuthApiError};
use crate::http_server::api::client::{api_url, ApiRequest};
use crate::http_server::auth::Authenticated;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegenerateKeyRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegenerateKeyResponse {
    pub success: bool,
    pub user_id: String,
    pub secret_key: String,
}

/// Rotate the caller's secret. The token used for this request is dead as
/// soon as the reply is sent.
pub async fn handler(
    State(state): State<ServiceState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AuthApiError> {
    require_self(&caller, &id)?;

    let secret_key = state.tokens().rotate_token(&id)?;

    Ok(Json(RegenerateKeyResponse {
        success: true,
        user_id: id,
        secret_key,
    }))
}

impl ApiRequest for RegenerateKeyRequest {
    type Response = RegenerateKeyResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        client.post(api_url(
            base_url,
            &format!("/api/v0/auth/users/{}/regenerate-key", self.user_id),
        ))
    }
}
