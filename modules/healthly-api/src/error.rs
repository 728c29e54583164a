use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

use healthly_common::DateFormatError;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed caller input.
    #[error("{0}")]
    Validation(String),

    /// A credential the route needs is not configured.
    #[error("{0} is missing")]
    MissingCredential(&'static str),

    /// Transport or status failure from a third-party service. `details`
    /// is already redacted.
    #[error("{message}")]
    Upstream { message: String, details: String },

    #[error(transparent)]
    DateFormat(#[from] DateFormatError),

    /// Object detection failed, including a request with no image.
    #[error("{0}")]
    Prediction(String),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Uniform error envelope.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Multipart(e) => e.status(),
            ApiError::MissingCredential(_)
            | ApiError::Upstream { .. }
            | ApiError::DateFormat(_)
            | ApiError::Prediction(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Upstream { message, details } => ErrorBody {
                error: message,
                details: Some(details),
            },
            ApiError::DateFormat(e) => {
                tracing::error!(error = %e, "Upstream record has a malformed action date");
                ErrorBody {
                    error: "Failed to build warning letter URL".to_string(),
                    details: Some(e.to_string()),
                }
            }
            ApiError::Multipart(e) => ErrorBody {
                error: e.body_text(),
                details: None,
            },
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                ErrorBody {
                    error: "Internal server error".to_string(),
                    details: None,
                }
            }
            other => ErrorBody {
                error: other.to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_message() {
        assert_eq!(
            ApiError::MissingCredential("API key").to_string(),
            "API key is missing"
        );
    }

    #[test]
    fn statuses() {
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Upstream {
                message: "x".into(),
                details: "y".into()
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::MissingCredential("API key").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
