use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{JsonBody, Text};
use crate::password::{hash_password, verify_password};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    username: Text,
    password: Text,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<Credentials>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    if body.username.is_blank() || body.password.is_blank() {
        return Err(ApiError::Validation(
            "Username and password are required".into(),
        ));
    }

    let username = body.username.as_str();
    let hash = hash_password(body.password.as_str())?;
    if !state.store.create_user(username, &hash).await? {
        return Err(ApiError::Conflict("Username already exists".into()));
    }

    info!(username, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<Credentials>,
) -> ApiResult<Json<Value>> {
    let invalid = || ApiError::Unauthorized("Invalid credentials".into());

    if body.username.is_blank() || body.password.is_blank() {
        return Err(invalid());
    }

    let user = state
        .store
        .find_user(body.username.as_str())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(body.password.as_str(), &user.password_hash) {
        return Err(invalid());
    }

    let token = state.jwt.create_token(&user.username)?;
    Ok(Json(json!({ "access_token": token })))
}

pub async fn protected(user: AuthUser) -> Json<Value> {
    Json(json!({ "logged_in_as": { "username": user.username } }))
}
