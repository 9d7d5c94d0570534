use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::wiki::{BatchOperation, BatchReport};

use super::WikiApiError;
use crate::http_server::api::client::{api_url, ApiRequest};
use crate::http_server::auth::Authenticated;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub operations: Vec<BatchOperation>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Authenticated(principal): Authenticated,
    Json(req): Json<BatchRequest>,
) -> Result<impl IntoResponse, WikiApiError> {
    let report = state.wiki().run_batch(&principal, req.operations).await?;
    Ok(Json(report))
}

impl ApiRequest for BatchRequest {
    type Response = BatchReport;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        client
            .post(api_url(base_url, "/api/v0/wiki/batch"))
            .json(&self)
    }
}
