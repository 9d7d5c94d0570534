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
pub struct DeactivateRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeactivateResponse {
    pub success: bool,
    pub user_id: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AuthApiError> {
    require_self(&caller, &id)?;
    state.tokens().deactivate(&id)?;

    Ok(Json(DeactivateResponse {
        success: true,
        user_id: id,
    }))
}

impl ApiRequest for DeactivateRequest {
    type Response = DeactivateResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        client.post(api_url(
            base_url,
            &format!("/api/v0/auth/users/{}/deactivate", self.user_id),
        ))
    }
}
