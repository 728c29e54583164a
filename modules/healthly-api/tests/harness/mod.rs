//! Shared router harness: a temp upload dir, mock upstreams, and helpers to
//! drive the axum `Router` in-process with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use healthly_api::store::Store;
use healthly_api::testing::{mock_upstreams, test_config, test_state, InMemoryStore};
use healthly_api::{build_router, AppState, Upstreams};
use healthly_common::AppConfig;

pub const BOUNDARY: &str = "healthly-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub upload_dir: TempDir,
}

impl TestApp {
    /// All mocks, in-memory store, full test config.
    pub fn new() -> Self {
        Self::build(|_| {}, mock_upstreams(), Arc::new(InMemoryStore::new()))
    }

    pub fn with_upstreams(upstreams: Upstreams) -> Self {
        Self::build(|_| {}, upstreams, Arc::new(InMemoryStore::new()))
    }

    pub fn build(
        configure: impl FnOnce(&mut AppConfig),
        upstreams: Upstreams,
        store: Arc<dyn Store>,
    ) -> Self {
        let upload_dir = tempfile::tempdir().expect("temp upload dir");
        let mut config = test_config(upload_dir.path());
        configure(&mut config);
        let state = test_state(config, upstreams, store);
        Self {
            router: build_router(state.clone()),
            state,
            upload_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(path, &body.to_string()).await
    }

    pub async fn post_raw(&self, path: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = self.send(request).await;
        let status = response.status();
        (status, read_json(response).await)
    }

    pub async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let response = self.send(Request::get(path).body(Body::empty()).unwrap()).await;
        let status = response.status();
        (status, read_json(response).await)
    }

    pub async fn post_file(&self, path: &str, filename: Option<&str>, data: &[u8]) -> Response<Body> {
        let request = Request::post(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body("file", filename, data)))
            .unwrap();
        self.send(request).await
    }

    /// Names of files currently in the upload dir.
    pub fn uploaded_files(&self) -> Vec<String> {
        std::fs::read_dir(self.upload_dir.path())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One-part multipart body. `filename: None` omits the attribute.
pub fn multipart_body(field: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn read_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec()
}

/// Body as JSON; `Value::Null` for an empty body, a string for non-JSON.
pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = read_bytes(response).await;
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}
