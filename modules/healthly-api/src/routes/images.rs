use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::header,
    response::{IntoResponse, Json, Redirect, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::uploads;
use crate::AppState;

const UPLOAD_FORM_PATH: &str = "/serpapi-upload";
const NOT_RECOGNIZED: &str = "object not recognized";

/// The `file` part of a multipart body: its client file name and bytes.
async fn file_part(multipart: &mut Multipart) -> ApiResult<Option<(Option<String>, Bytes)>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let data = field.bytes().await?;
        return Ok(Some((filename, data)));
    }
    Ok(None)
}

/// Save an image, run a reverse-image search on its public URL, then prune
/// old uploads. Missing or disallowed files redirect back to the form.
pub async fn serpapi_upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    let Ok(mut multipart) = multipart else {
        warn!("Upload is not a multipart request");
        return Ok(Redirect::to(UPLOAD_FORM_PATH).into_response());
    };

    let Some((filename, data)) = file_part(&mut multipart).await? else {
        info!("No file part");
        return Ok(Redirect::to(UPLOAD_FORM_PATH).into_response());
    };

    let filename = filename.unwrap_or_default();
    if filename.is_empty() {
        info!("No selected file");
        return Ok(Redirect::to(UPLOAD_FORM_PATH).into_response());
    }

    let Some(ext) = uploads::allowed_extension(&filename, &state.config.allowed_extensions) else {
        info!(filename = %filename, "Rejected upload extension");
        return Ok(Redirect::to(UPLOAD_FORM_PATH).into_response());
    };

    if state.config.serp_api_key.is_none() {
        return Err(ApiError::MissingCredential("SerpApi key"));
    }

    let dir = &state.config.upload_dir;
    let stored = uploads::save(dir, &ext, &data).await?;
    let image_url = format!("{}/serpapi-uploads/{stored}", state.config.public_base_url);

    let label = state.upstreams.reverse_image.identify(&image_url).await;

    uploads::prune(dir, Duration::from_secs(state.config.upload_retention_secs)).await;

    let label = label.map_err(|e| {
        state.upstream_error("/serpapi-upload", "Failed to run reverse image search", e)
    })?;
    let result = label.unwrap_or_else(|| NOT_RECOGNIZED.to_string());
    info!(result = %result, "Reverse image search finished");

    Ok(Json(json!({ "result": result })).into_response())
}

pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let path = uploads::locate(&state.config.upload_dir, &filename)
        .await
        .ok_or(ApiError::NotFound)?;

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(ApiError::NotFound),
        Err(e) => return Err(anyhow::Error::from(e).into()),
    };

    Ok((
        [(header::CONTENT_TYPE, uploads::content_type_for(&filename))],
        data,
    )
        .into_response())
}

/// Run the object detector and return the annotated image as base64.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut multipart = multipart.map_err(|e| ApiError::Prediction(e.body_text()))?;

    let (_, data) = file_part(&mut multipart)
        .await
        .map_err(|e| ApiError::Prediction(e.to_string()))?
        .ok_or_else(|| ApiError::Prediction("No file part in the request".into()))?;

    let annotated = state
        .upstreams
        .detector
        .annotate(data.to_vec())
        .await
        .map_err(|e| {
            let details = state.redact(&format!("{e:#}"));
            tracing::error!(error = %details, "Error in prediction");
            ApiError::Prediction(details)
        })?;

    Ok(Json(json!({ "result": STANDARD.encode(annotated) })))
}
