use axum::Router;

pub mod auth;
pub mod wiki;

use crate::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .nest("/wiki", wiki::router())
        .nest("/auth", auth::router())
}
