use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use super::PrincipalView;
use crate::http_server::api::client::{api_url, ApiRequest};
use crate::http_server::auth::Authenticated;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: PrincipalView,
}

/// Reaching the handler means the bearer token resolved.
pub async fn handler(Authenticated(principal): Authenticated) -> impl IntoResponse {
    Json(VerifyResponse {
        valid: true,
        user: PrincipalView::public(principal),
    })
}

impl ApiRequest for VerifyRequest {
    type Response = VerifyResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        client.get(api_url(base_url, "/api/v0/auth/verify"))
    }
}
