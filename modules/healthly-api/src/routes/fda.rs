use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use datadashboard_client::ComplianceAction;
use healthly_common::warning_letter_url;
use historical_index_client::IndexedDocument;
use openfda_client::{HistoricalDocument, SearchQuery};

use crate::error::{ApiError, ApiResult};
use crate::extract::{JsonBody, Text};
use crate::AppState;

const FETCH_FAILED: &str = "Failed to fetch data from the API";
const AT_LEAST_ONE: &str = "At least one search parameter is required";

// --- Request bodies ---

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnforcementRequest {
    product_description: Text,
    recalling_firm: Text,
    recall_number: Text,
    recall_class: Text,
    from_date: Text,
    to_date: Text,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct K510Request {
    k510_number: Text,
    applicant_name: Text,
    device_name: Text,
    from_date: Text,
    to_date: Text,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaudeRequest {
    device_name: Text,
    firm_name: Text,
    from_date: Text,
    to_date: Text,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HistoricalRequest {
    keyword: Text,
    year: Text,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarningLetterRequest {
    firm_name: Text,
}

// --- Responses ---

/// Historical document, from either backend. Missing values are `"N/A"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalRecord {
    pub num_of_pages: Value,
    pub year: Value,
    pub text: Value,
    pub doc_type: Value,
}

fn or_not_available(value: Option<Value>) -> Value {
    value.unwrap_or_else(|| Value::String("N/A".to_string()))
}

impl From<HistoricalDocument> for HistoricalRecord {
    fn from(doc: HistoricalDocument) -> Self {
        Self {
            num_of_pages: or_not_available(doc.num_of_pages),
            year: or_not_available(doc.year),
            text: or_not_available(doc.text.map(Value::String)),
            doc_type: or_not_available(doc.doc_type.map(Value::String)),
        }
    }
}

impl From<IndexedDocument> for HistoricalRecord {
    fn from(doc: IndexedDocument) -> Self {
        Self {
            num_of_pages: doc.num_of_pages,
            year: doc.year,
            text: doc.text,
            doc_type: doc.doc_type,
        }
    }
}

/// Compliance action plus the link to its published warning letter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarningLetter {
    #[serde(flatten)]
    pub action: ComplianceAction,
    pub warning_letter_url: String,
}

/// Attach letter URLs, dropping actions without a case id, date, or legal
/// name. Order is preserved; a malformed date fails the whole batch.
pub fn with_letter_urls(actions: Vec<ComplianceAction>) -> ApiResult<Vec<WarningLetter>> {
    let mut letters = Vec::with_capacity(actions.len());
    for action in actions {
        let (Some(case_id), Some(date), Some(name)) = (
            action.case_injunction_id.as_ref(),
            action.action_taken_date.as_deref(),
            action.legal_name.as_deref(),
        ) else {
            continue;
        };
        let url = warning_letter_url(case_id, date, name)?;
        letters.push(WarningLetter {
            action,
            warning_letter_url: url,
        });
    }
    Ok(letters)
}

// --- Handlers ---

pub async fn device_enforcement(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<EnforcementRequest>,
) -> ApiResult<Json<Value>> {
    info!(?body, "Device enforcement search");

    if body.product_description.is_blank() {
        return Err(ApiError::Validation("Product description is required".into()));
    }
    state.require_fda_key()?;

    let query = SearchQuery::new()
        .phrase("product_description", body.product_description.as_str())
        .phrase("recalling_firm", body.recalling_firm.as_str())
        .phrase("recall_number", body.recall_number.as_str())
        .phrase("classification", body.recall_class.as_str())
        .date_range("report_date", body.from_date.as_str(), body.to_date.as_str());

    state
        .upstreams
        .fda
        .device_enforcement(&query)
        .await
        .map(Json)
        .map_err(|e| state.upstream_error("/", FETCH_FAILED, e))
}

pub async fn device_510k(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<K510Request>,
) -> ApiResult<Json<Value>> {
    info!(?body, "510(k) search");

    let any_given = [
        &body.k510_number,
        &body.applicant_name,
        &body.device_name,
        &body.from_date,
        &body.to_date,
    ]
    .iter()
    .any(|f| !f.is_blank());
    if !any_given {
        return Err(ApiError::Validation(AT_LEAST_ONE.into()));
    }
    state.require_fda_key()?;

    let query = SearchQuery::new()
        .phrase("k_number.exact", body.k510_number.as_str())
        .phrase("applicant", body.applicant_name.as_str())
        .phrase("device_name", body.device_name.as_str())
        .date_range("decision_date", body.from_date.as_str(), body.to_date.as_str());

    state
        .upstreams
        .fda
        .device_510k(&query)
        .await
        .map(Json)
        .map_err(|e| state.upstream_error("/k510", FETCH_FAILED, e))
}

pub async fn maude(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<MaudeRequest>,
) -> ApiResult<Json<Value>> {
    info!(?body, "MAUDE search");

    if body.device_name.is_blank() && body.firm_name.is_blank() {
        return Err(ApiError::Validation(AT_LEAST_ONE.into()));
    }
    state.require_fda_key()?;

    let query = SearchQuery::new()
        .phrase("device.generic_name", body.device_name.as_str())
        .phrase("device.manufacturer_d_name", body.firm_name.as_str())
        .date_range("date_received", body.from_date.as_str(), body.to_date.as_str());

    state
        .upstreams
        .fda
        .device_events(&query)
        .await
        .map(Json)
        .map_err(|e| state.upstream_error("/maude", FETCH_FAILED, e))
}

/// Historical documents from the search index when one is configured,
/// otherwise from openFDA. Exactly one backend is called.
pub async fn open_historical(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<HistoricalRequest>,
) -> ApiResult<Json<Vec<HistoricalRecord>>> {
    info!(?body, "Historical document search");

    if body.keyword.is_blank() {
        return Err(ApiError::Validation("Keyword is required".into()));
    }
    let year = body.year.value();

    if let Some(ref index) = state.upstreams.historical_index {
        let docs = index
            .search(body.keyword.as_str(), year.as_deref())
            .await
            .map_err(|e| state.upstream_error("/openhistorical", FETCH_FAILED, e))?;
        return Ok(Json(docs.into_iter().map(Into::into).collect()));
    }

    state.require_fda_key()?;
    let query = SearchQuery::new()
        .phrase("text", body.keyword.as_str())
        .term("year", body.year.as_str());

    let docs = state
        .upstreams
        .fda
        .historical_documents(&query)
        .await
        .map_err(|e| state.upstream_error("/openhistorical", FETCH_FAILED, e))?;
    Ok(Json(docs.into_iter().map(Into::into).collect()))
}

pub async fn warning_letters(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<WarningLetterRequest>,
) -> ApiResult<Json<Vec<WarningLetter>>> {
    let firm = body.firm_name.as_str();
    info!(firm, "Warning letter search");

    let actions = state
        .upstreams
        .compliance
        .warning_letters(firm)
        .await
        .map_err(|e| state.upstream_error("/warning_letters", "Failed to fetch data from FDA API", e))?;

    let letters = with_letter_urls(actions)?;
    info!(count = letters.len(), "Warning letters with URLs");
    Ok(Json(letters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use datadashboard_client::CaseInjunctionId;
    use serde_json::json;

    fn action(id: Option<i64>, date: Option<&str>, name: Option<&str>) -> ComplianceAction {
        ComplianceAction {
            firm_profile: None,
            fei_number: None,
            action_type: Some(json!("Warning Letter")),
            state: Some(json!("CA")),
            action_taken_date: date.map(String::from),
            legal_name: name.map(String::from),
            case_injunction_id: id.map(|n| CaseInjunctionId::Number(n.into())),
        }
    }

    #[test]
    fn incomplete_actions_are_dropped_in_order() {
        let actions = vec![
            action(Some(1), Some("2023-01-02"), Some("Alpha Inc")),
            action(None, Some("2023-01-03"), Some("Beta Inc")),
            action(Some(3), Some("2023-01-04"), Some("Gamma Inc")),
        ];
        let letters = with_letter_urls(actions).unwrap();
        assert_eq!(letters.len(), 2);
        assert!(letters[0].warning_letter_url.ends_with("/alpha-inc-1-01022023"));
        assert!(letters[1].warning_letter_url.ends_with("/gamma-inc-3-01042023"));
    }

    #[test]
    fn malformed_date_fails_batch() {
        let actions = vec![action(Some(1), Some("2023-13-40"), Some("Alpha Inc"))];
        assert!(matches!(
            with_letter_urls(actions),
            Err(ApiError::DateFormat(_))
        ));
    }

    #[test]
    fn letter_serializes_flat() {
        let letters =
            with_letter_urls(vec![action(Some(7), Some("2022-12-31"), Some("Acme"))]).unwrap();
        let json = serde_json::to_value(&letters[0]).unwrap();
        assert_eq!(json["CaseInjunctionID"], 7);
        assert_eq!(json["LegalName"], "Acme");
        assert!(json["warning_letter_url"]
            .as_str()
            .unwrap()
            .ends_with("/acme-7-12312022"));
    }

    #[test]
    fn openfda_document_gaps_become_not_available() {
        let doc = HistoricalDocument {
            num_of_pages: None,
            year: Some(json!(1978)),
            text: Some("memo".into()),
            doc_type: None,
            download_url: None,
        };
        let record = HistoricalRecord::from(doc);
        assert_eq!(record.num_of_pages, "N/A");
        assert_eq!(record.year, 1978);
        assert_eq!(record.doc_type, "N/A");
    }
}
