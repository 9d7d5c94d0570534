//! Single-page routes: read, write and delete one key.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use super::{captured_path, WikiApiError};
use crate::http_server::api::client::{api_url, ApiRequest};
use crate::http_server::auth::Authenticated;
use crate::ServiceState;

fn file_url(base_url: &Url, path: &str) -> Url {
    api_url(
        base_url,
        &format!("/api/v0/wiki/file/{}", path.trim_start_matches('/')),
    )
}

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct GetFileRequest {
    /// Full key of the page, e.g. users/alice/notes.md
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetFileResponse {
    pub success: bool,
    pub path: String,
    pub content: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

pub async fn get_handler(
    State(state): State<ServiceState>,
    Authenticated(principal): Authenticated,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, WikiApiError> {
    let file = state
        .wiki()
        .get_file(&principal, captured_path(&path))
        .await?;

    Ok(Json(GetFileResponse {
        success: true,
        path: file.path,
        content: file.content,
        size: file.size,
        last_modified: file.last_modified,
    }))
}

impl ApiRequest for GetFileRequest {
    type Response = GetFileResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        client.get(file_url(base_url, &self.path))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutFileBody {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PutFileRequest {
    pub path: String,
    pub content: String,
}

/// Reply to a write or delete of a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteFileResponse {
    pub success: bool,
    pub path: String,
}

pub async fn put_handler(
    State(state): State<ServiceState>,
    Authenticated(principal): Authenticated,
    Path(path): Path<String>,
    Json(body): Json<PutFileBody>,
) -> Result<impl IntoResponse, WikiApiError> {
    let path = captured_path(&path);
    let content = body
        .content
        .ok_or_else(|| WikiApiError::BadRequest("content is required".to_string()))?;

    state.wiki().put_file(&principal, path, &content).await?;

    Ok(Json(WriteFileResponse {
        success: true,
        path: path.to_string(),
    }))
}

impl ApiRequest for PutFileRequest {
    type Response = WriteFileResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        client.put(file_url(base_url, &self.path)).json(&PutFileBody {
            content: Some(self.content),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct DeleteFileRequest {
    /// Full key of the page to delete
    pub path: String,
}

pub async fn delete_handler(
    State(state): State<ServiceState>,
    Authenticated(principal): Authenticated,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, WikiApiError> {
    let path = captured_path(&path);
    state.wiki().delete_file(&principal, path).await?;

    Ok(Json(WriteFileResponse {
        success: true,
        path: path.to_string(),
    }))
}

impl ApiRequest for DeleteFileRequest {
    type Response = WriteFileResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        client.delete(file_url(base_url, &self.path))
    }
}
