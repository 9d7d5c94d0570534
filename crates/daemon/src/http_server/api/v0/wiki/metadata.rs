use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::wiki::Stat;

use super::{captured_path, WikiApiError};
use crate::http_server::api::client::{api_url, ApiRequest};
use crate::http_server::auth::Authenticated;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct MetadataRequest {
    /// Page key, or directory with a trailing '/'
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub success: bool,
    pub exists: bool,
    #[serde(flatten)]
    pub stat: Stat,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Authenticated(principal): Authenticated,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, WikiApiError> {
    let stat = state.wiki().stat(&principal, captured_path(&path)).await?;

    Ok(Json(MetadataResponse {
        success: true,
        exists: true,
        stat,
    }))
}

impl ApiRequest for MetadataRequest {
    type Response = MetadataResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let url = api_url(
            base_url,
            &format!(
                "/api/v0/wiki/metadata/{}",
                self.path.trim_start_matches('/')
            ),
        );
        client.get(url)
    }
}
