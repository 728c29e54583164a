//! Registration, login, and bearer-token access.

mod harness;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};

use healthly_api::testing::{mock_upstreams, InMemoryStore};

use harness::{read_json, TestApp};

async fn protected(app: &TestApp, authorization: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::get("/protected");
    if let Some(value) = authorization {
        request = request.header(header::AUTHORIZATION, value);
    }
    let response = app.send(request.body(Body::empty()).unwrap()).await;
    let status = response.status();
    (status, read_json(response).await)
}

async fn register_and_login(app: &TestApp, username: &str, password: &str) -> String {
    let (status, _) = app
        .post_json("/register", json!({"username": username, "password": password}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post_json("/login", json!({"username": username, "password": password}))
        .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_requires_both_fields() {
    let app = TestApp::new();

    let (status, body) = app.post_json("/register", json!({"username": "ana"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Username and password are required"}));

    let (status, _) = app.post_raw("/register", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_registration_is_409() {
    let store = Arc::new(InMemoryStore::new());
    let app = TestApp::build(|_| {}, mock_upstreams(), store.clone());
    let creds = json!({"username": "ana", "password": "s3cret"});

    let (status, body) = app.post_json("/register", creds.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"message": "User registered successfully"}));

    let (status, body) = app.post_json("/register", creds).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already exists");

    let users = store.users();
    assert_eq!(users.len(), 1);
    assert_ne!(users[0].password_hash, "s3cret", "password stored hashed");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = TestApp::new();
    app.post_json("/register", json!({"username": "ana", "password": "s3cret"}))
        .await;

    for creds in [
        json!({"username": "ana", "password": "wrong"}),
        json!({"username": "bob", "password": "s3cret"}),
        json!({}),
    ] {
        let (status, body) = app.post_json("/login", creds).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");
    }
}

#[tokio::test]
async fn token_grants_access_to_protected() {
    let app = TestApp::new();
    let token = register_and_login(&app, "ana", "s3cret").await;

    let (status, body) = protected(&app, Some(&format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"logged_in_as": {"username": "ana"}}));
}

#[tokio::test]
async fn protected_rejects_missing_or_tampered_token() {
    let app = TestApp::new();
    let token = register_and_login(&app, "ana", "s3cret").await;

    let (status, body) = protected(&app, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing Authorization Header");

    let (status, _) = protected(&app, Some(&format!("Token {token}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = protected(&app, Some(&format!("Bearer {token}x"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn token_from_other_secret_is_rejected() {
    let issuing = TestApp::build(
        |c| c.jwt_secret = "another-secret".into(),
        mock_upstreams(),
        Arc::new(InMemoryStore::new()),
    );
    let token = register_and_login(&issuing, "ana", "s3cret").await;

    let app = TestApp::new();
    let (status, _) = protected(&app, Some(&format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
