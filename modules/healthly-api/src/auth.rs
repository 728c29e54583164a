use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::jwt::parse_bearer;
use crate::AppState;

/// Caller authenticated by a bearer token. Extract this in handlers that
/// require auth; a missing, malformed, or expired token is a 401.
pub struct AuthUser {
    pub username: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization Header".to_string()))?;

        let token = parse_bearer(header)
            .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization Header".to_string()))?;

        match state.jwt.verify_token(token) {
            Ok(claims) => Ok(AuthUser {
                username: claims.sub,
            }),
            Err(e) => {
                tracing::info!(error = %e, "Rejected bearer token");
                Err(ApiError::Unauthorized("Invalid or expired token".to_string()))
            }
        }
    }
}
