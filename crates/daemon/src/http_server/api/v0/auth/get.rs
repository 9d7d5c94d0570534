use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::identity::IdentityError;

use super::{require_self, AuthApiError, PrincipalView};
use crate::http_server::api::client::{api_url, ApiRequest};
use crate::http_server::auth::Authenticated;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserResponse {
    pub success: bool,
    pub user: PrincipalView,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AuthApiError> {
    require_self(&caller, &id)?;

    let principal = state
        .tokens()
        .get(&id)
        .ok_or(IdentityError::NotFound(id))?;

    Ok(Json(GetUserResponse {
        success: true,
        user: PrincipalView::public(principal),
    }))
}

impl ApiRequest for GetUserRequest {
    type Response = GetUserResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        client.get(api_url(
            base_url,
            &format!("/api/v0/auth/users/{}", self.user_id),
        ))
    }
}
