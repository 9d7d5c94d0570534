use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::auth::owned_prefix;
use common::wiki::ListingEntry;

use super::WikiApiError;
use crate::http_server::api::client::{api_url, ApiRequest};
use crate::http_server::auth::Authenticated;
use crate::ServiceState;

#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
pub struct ListFilesRequest {
    /// Directory to list (defaults to your own root)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFilesResponse {
    pub success: bool,
    pub path: String,
    pub files: Vec<ListingEntry>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Authenticated(principal): Authenticated,
    Query(req): Query<ListFilesRequest>,
) -> Result<impl IntoResponse, WikiApiError> {
    let path = match req.path {
        Some(path) if !path.is_empty() => path,
        _ => owned_prefix(&principal.id),
    };

    let files = state.wiki().list_children(&principal, &path).await?;

    Ok(Json(ListFilesResponse {
        success: true,
        path,
        files,
    }))
}

impl ApiRequest for ListFilesRequest {
    type Response = ListFilesResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let url = api_url(base_url, "/api/v0/wiki/files");
        match self.path {
            Some(path) => client.get(url).query(&[("path", path)]),
            None => client.get(url),
        }
    }
}
