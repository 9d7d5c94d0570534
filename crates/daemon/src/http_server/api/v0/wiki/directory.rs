use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::wiki::{normalize_dir, KeyFailure};

use super::{captured_path, WikiApiError};
use crate::http_server::api::client::{api_url, ApiRequest};
use crate::http_server::auth::Authenticated;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct DeleteDirectoryRequest {
    /// Directory to delete, with everything beneath it
    pub path: String,
}

/// Per-key accounting of a recursive delete. `success` is false when any
/// key could not be removed; the remaining keys are still gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDirectoryResponse {
    pub success: bool,
    pub path: String,
    pub deleted_count: usize,
    pub total_keys: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<KeyFailure>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Authenticated(principal): Authenticated,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, WikiApiError> {
    let path = normalize_dir(captured_path(&path));
    let report = state.wiki().delete_subtree(&principal, &path).await?;

    if !report.is_complete() {
        tracing::warn!(
            path = %path,
            failed = report.failures.len(),
            total = report.total_keys,
            "directory delete left keys behind"
        );
    }

    Ok(Json(DeleteDirectoryResponse {
        success: report.is_complete(),
        path,
        deleted_count: report.succeeded,
        total_keys: report.total_keys,
        failures: report.failures,
    }))
}

impl ApiRequest for DeleteDirectoryRequest {
    type Response = DeleteDirectoryResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let url = api_url(
            base_url,
            &format!(
                "/api/v0/wiki/directory/{}",
                normalize_dir(self.path.trim_start_matches('/'))
            ),
        );
        client.delete(url)
    }
}
