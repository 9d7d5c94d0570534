use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;

use common::wiki::WikiError;

use crate::http_server::handlers::error_response;
use crate::ServiceState;

pub mod batch;
pub mod directory;
pub mod file;
pub mod files;
pub mod folder;
pub mod init_user;
pub mod metadata;
pub mod transfer;

pub use batch::BatchRequest;
pub use directory::{DeleteDirectoryRequest, DeleteDirectoryResponse};
pub use file::{
    DeleteFileRequest, GetFileRequest, GetFileResponse, PutFileBody, PutFileRequest,
    WriteFileResponse,
};
pub use files::{ListFilesRequest, ListFilesResponse};
pub use folder::{CreateFolderRequest, CreateFolderResponse};
pub use init_user::{InitUserRequest, InitUserResponse};
pub use metadata::{MetadataRequest, MetadataResponse};
pub use transfer::{CopyRequest, MoveRequest, TransferBody, TransferResponse};

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/files", get(files::handler))
        .route(
            "/file/*path",
            get(file::get_handler)
                .put(file::put_handler)
                .delete(file::delete_handler),
        )
        .route("/directory/*path", delete(directory::handler))
        .route("/folder", post(folder::handler))
        .route("/copy", post(transfer::copy_handler))
        .route("/move", post(transfer::move_handler))
        .route("/rename", post(transfer::move_handler))
        .route("/batch", post(batch::handler))
        .route("/metadata/*path", get(metadata::handler))
        .route("/init-user", post(init_user::handler))
}

/// Failure of a wiki route.
#[derive(Debug, thiserror::Error)]
pub enum WikiApiError {
    #[error(transparent)]
    Wiki(#[from] WikiError),
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for WikiApiError {
    fn into_response(self) -> Response {
        match self {
            WikiApiError::BadRequest(message) => error_response(StatusCode::BAD_REQUEST, message),
            WikiApiError::Wiki(e) => match e {
                WikiError::Validation(_) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
                WikiError::AccessDenied(_) => error_response(StatusCode::FORBIDDEN, e.to_string()),
                WikiError::NotFound(_) => error_response(StatusCode::NOT_FOUND, e.to_string()),
                WikiError::PartialFailure { .. } => {
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
                WikiError::Store(err) => {
                    tracing::error!(error = %err, code = err.code(), "object store failure");
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, "storage backend error")
                }
            },
        }
    }
}

/// Wildcard captures arrive without the route prefix; strip any stray
/// leading slash so they validate as keys.
pub(crate) fn captured_path(path: &str) -> &str {
    path.trim_start_matches('/')
}
