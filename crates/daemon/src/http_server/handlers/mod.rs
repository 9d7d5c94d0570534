mod not_found;

pub use not_found::not_found_handler;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// JSON body shared by every API failure: `{ "success": false, "error": ... }`.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({
        "success": false,
        "error": message.into(),
    });
    (status, Json(body)).into_response()
}
