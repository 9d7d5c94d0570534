//! Copy and move of a page or a whole directory.
//!
//! `is_directory` may be omitted, in which case the source path's inferred
//! type decides: a trailing `/`, or a last segment with no `.`, means a
//! directory. A directory transfer reports every key it touched; keys that
//! failed are listed and `success` is false.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::wiki::{resolve_type, KeyFailure, PathType, SubtreeReport};

use super::WikiApiError;
use crate::http_server::api::client::{api_url, ApiRequest};
use crate::http_server::auth::Authenticated;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferBody {
    pub source_path: String,
    pub destination_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_directory: Option<bool>,
}

impl TransferBody {
    fn is_directory(&self) -> bool {
        self.is_directory
            .unwrap_or_else(|| resolve_type(&self.source_path) == PathType::Directory)
    }
}

pub type CopyRequest = TransferBody;

/// Same body as a copy; only the route differs.
#[derive(Debug, Clone)]
pub struct MoveRequest(pub TransferBody);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResponse {
    pub success: bool,
    pub source_path: String,
    pub destination_path: String,
    pub total_keys: usize,
    pub succeeded: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<KeyFailure>,
}

impl TransferResponse {
    fn new(body: TransferBody, report: SubtreeReport) -> Self {
        Self {
            success: report.is_complete(),
            source_path: body.source_path,
            destination_path: body.destination_path,
            total_keys: report.total_keys,
            succeeded: report.succeeded,
            failures: report.failures,
        }
    }
}

pub async fn copy_handler(
    State(state): State<ServiceState>,
    Authenticated(principal): Authenticated,
    Json(body): Json<TransferBody>,
) -> Result<impl IntoResponse, WikiApiError> {
    let report = state
        .wiki()
        .copy(
            &principal,
            &body.source_path,
            &body.destination_path,
            body.is_directory(),
        )
        .await?;

    Ok(Json(TransferResponse::new(body, report)))
}

/// Serves both `/move` and `/rename`.
pub async fn move_handler(
    State(state): State<ServiceState>,
    Authenticated(principal): Authenticated,
    Json(body): Json<TransferBody>,
) -> Result<impl IntoResponse, WikiApiError> {
    let report = state
        .wiki()
        .mv(
            &principal,
            &body.source_path,
            &body.destination_path,
            body.is_directory(),
        )
        .await?;

    if !report.is_complete() {
        tracing::warn!(
            src = %body.source_path,
            dst = %body.destination_path,
            failed = report.failures.len(),
            "move incomplete; source left in place"
        );
    }

    Ok(Json(TransferResponse::new(body, report)))
}

impl ApiRequest for TransferBody {
    type Response = TransferResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        client
            .post(api_url(base_url, "/api/v0/wiki/copy"))
            .json(&self)
    }
}

impl ApiRequest for MoveRequest {
    type Response = TransferResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        client
            .post(api_url(base_url, "/api/v0/wiki/move"))
            .json(&self.0)
    }
}
