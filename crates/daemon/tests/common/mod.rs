//! Shared fixture for router tests: an in-memory daemon state with two
//! principals, driven through the axum router without a listener.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use ::common::identity::{Principal, TokenStore};
use object_store::Storage;
use quire_daemon::http_server;
use quire_daemon::ServiceState;

pub struct TestApp {
    pub router: Router,
    pub state: ServiceState,
    pub alice: Principal,
    pub bob: Principal,
}

pub fn setup_app(allow_registration: bool) -> TestApp {
    let tokens = TokenStore::new();
    let alice = tokens
        .issue_token("alice", Some("alice@example.com".to_string()))
        .unwrap();
    let bob = tokens.issue_token("bob", None).unwrap();

    let state = ServiceState::new(Arc::new(Storage::memory()), tokens, allow_registration);
    TestApp {
        router: http_server::router(state.clone()),
        state,
        alice,
        bob,
    }
}

impl TestApp {
    /// Send one request and decode the JSON reply.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put_page(&self, token: &str, path: &str, content: &str) -> StatusCode {
        let (status, _) = self
            .send(
                Method::PUT,
                &format!("/api/v0/wiki/file/{}", path),
                Some(token),
                Some(serde_json::json!({ "content": content })),
            )
            .await;
        status
    }
}
