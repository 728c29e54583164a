use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde::Deserialize;
use tracing::info;

use bizfile_client::BusinessEntity;
use cdph_client::RecallLink;

use crate::error::{ApiError, ApiResult};
use crate::extract::{JsonBody, Text};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CdphRequest {
    device_name: Text,
    firm_name: Text,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessEntityRequest {
    search_term: Text,
}

pub async fn cdph(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<CdphRequest>,
) -> ApiResult<Json<Vec<RecallLink>>> {
    info!(?body, "CDPH recall search");

    if body.device_name.is_blank() && body.firm_name.is_blank() {
        return Err(ApiError::Validation(
            "At least one search parameter is required".into(),
        ));
    }

    state
        .upstreams
        .recalls
        .search(body.device_name.as_str(), body.firm_name.as_str())
        .await
        .map(Json)
        .map_err(|e| state.upstream_error("/cdph", "Failed to fetch data from the CDPH website", e))
}

pub async fn ca_business_entity(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<BusinessEntityRequest>,
) -> ApiResult<Json<Vec<BusinessEntity>>> {
    info!(?body, "CA business entity search");

    if body.search_term.is_blank() {
        return Err(ApiError::Validation("Search term is required".into()));
    }

    state
        .upstreams
        .registry
        .search(body.search_term.as_str())
        .await
        .map(Json)
        .map_err(|e| {
            state.upstream_error(
                "/ca-business-entity",
                "Failed to fetch data from the website",
                e,
            )
        })
}
