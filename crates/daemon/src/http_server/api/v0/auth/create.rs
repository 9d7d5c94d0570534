use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use super::{AuthApiError, PrincipalView};
use crate::http_server::api::client::{api_url, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct CreateUserRequest {
    /// Id of the new principal; becomes users/<id>/
    pub user_id: String,

    /// Contact address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub success: bool,
    pub user: PrincipalView,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    if !state.allow_registration() {
        return Err(AuthApiError::RegistrationDisabled);
    }

    let principal = state.tokens().issue_token(&req.user_id, req.email)?;

    // The account is usable without its welcome page
    if let Err(e) = state.wiki().init_user_directory(&principal).await {
        tracing::warn!(principal = %principal.id, error = %e, "failed to write welcome page");
    }

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            success: true,
            user: PrincipalView::with_secret(principal),
        }),
    ))
}

impl ApiRequest for CreateUserRequest {
    type Response = CreateUserResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        client
            .post(api_url(base_url, "/api/v0/auth/users"))
            .json(&self)
    }
}
