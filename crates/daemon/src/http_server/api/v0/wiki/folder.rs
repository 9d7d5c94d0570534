use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use super::WikiApiError;
use crate::http_server::api::client::{api_url, ApiRequest};
use crate::http_server::auth::Authenticated;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct CreateFolderRequest {
    /// Directory to create
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderResponse {
    pub success: bool,
    pub path: String,
    /// Key of the marker object that keeps the directory listable
    pub marker: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Authenticated(principal): Authenticated,
    Json(req): Json<CreateFolderRequest>,
) -> Result<impl IntoResponse, WikiApiError> {
    let marker = state.wiki().create_folder(&principal, &req.path).await?;

    Ok((
        http::StatusCode::CREATED,
        Json(CreateFolderResponse {
            success: true,
            path: req.path,
            marker,
        }),
    ))
}

impl ApiRequest for CreateFolderRequest {
    type Response = CreateFolderResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        client
            .post(api_url(base_url, "/api/v0/wiki/folder"))
            .json(&self)
    }
}
