pub mod account;
pub mod fda;
pub mod images;
pub mod records;
pub mod registry;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::AppState;

/// Every route, with CORS, request tracing and the upload size cap applied.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        // Health check
        .route("/health", get(|| async { "ok" }))
        // openFDA
        .route("/", post(fda::device_enforcement))
        .route("/k510", post(fda::device_510k))
        .route("/maude", post(fda::maude))
        .route("/openhistorical", post(fda::open_historical))
        .route("/warning_letters", post(fda::warning_letters))
        // Scraped / registry sources
        .route("/cdph", post(registry::cdph))
        .route("/ca-business-entity", post(registry::ca_business_entity))
        // Images
        .route("/serpapi-upload", post(images::serpapi_upload))
        .route("/serpapi-uploads/{filename}", get(images::serve_upload))
        .route("/predict", post(images::predict))
        // Stored records
        .route("/contacts", get(records::list_contacts).post(records::create_contact))
        .route("/licenses", get(records::search_licenses))
        .route("/license-search", get(records::search_licenses))
        // Accounts
        .route("/register", post(account::register))
        .route("/login", post(account::login))
        .route("/protected", get(account::protected))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        // Logging layer: method + path only (no query params, no bodies)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

/// Any origin when none are configured.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
