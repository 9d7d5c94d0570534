use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::auth::owned_prefix;

use super::WikiApiError;
use crate::http_server::api::client::{api_url, ApiRequest};
use crate::http_server::auth::Authenticated;
use crate::ServiceState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitUserRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitUserResponse {
    pub success: bool,
    /// False when the directory already had content
    pub created: bool,
    pub path: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Authenticated(principal): Authenticated,
) -> Result<impl IntoResponse, WikiApiError> {
    let created = state.wiki().init_user_directory(&principal).await?;

    Ok(Json(InitUserResponse {
        success: true,
        created,
        path: owned_prefix(&principal.id),
    }))
}

impl ApiRequest for InitUserRequest {
    type Response = InitUserResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        client
            .post(api_url(base_url, "/api/v0/wiki/init-user"))
            .json(&self)
    }
}
