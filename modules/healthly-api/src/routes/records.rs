use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::{JsonBody, Text};
use crate::store::{Contact, License, LicenseFilter, NewContact};
use crate::AppState;

// --- Contacts ---

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    county: Text,
    name: Text,
    address: Text,
    phone: Text,
    fax: Text,
    link_to_website: Text,
}

impl TryFrom<ContactRequest> for NewContact {
    type Error = ApiError;

    fn try_from(req: ContactRequest) -> Result<Self, Self::Error> {
        let required = |field: &'static str, value: &Text| {
            value
                .value()
                .ok_or_else(|| ApiError::Validation(format!("Missing required field: {field}")))
        };

        Ok(NewContact {
            county: required("county", &req.county)?,
            name: required("name", &req.name)?,
            address: required("address", &req.address)?,
            phone: required("phone", &req.phone)?,
            fax: req.fax.value(),
            link_to_website: req.link_to_website.value(),
        })
    }
}

pub async fn list_contacts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Contact>>> {
    let contacts = state.store.list_contacts().await?;
    Ok(Json(contacts))
}

pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<ContactRequest>,
) -> ApiResult<(StatusCode, Json<Contact>)> {
    let contact = NewContact::try_from(body)?;
    let stored = state.store.insert_contact(contact).await?;
    info!(id = stored.id, county = %stored.county, "Contact created");
    Ok((StatusCode::CREATED, Json(stored)))
}

// --- Licenses ---

/// Query string of `/licenses` and `/license-search`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LicenseQuery {
    business_name: Option<String>,
    license_code_description: Option<String>,
    license_status_code: Option<String>,
    license_address_type_description: Option<String>,
    address_line1: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    county_code: Option<String>,
    expiration_date: Option<String>,
}

impl TryFrom<LicenseQuery> for LicenseFilter {
    type Error = ApiError;

    fn try_from(q: LicenseQuery) -> Result<Self, Self::Error> {
        let columns = [
            ("business_name", q.business_name),
            ("license_code_description", q.license_code_description),
            ("license_status_code", q.license_status_code),
            ("license_address_type_description", q.license_address_type_description),
            ("address_line_1", q.address_line1),
            ("city", q.city),
            ("state", q.state),
            ("zip", q.zip),
            ("county_code", q.county_code),
        ];

        let text = columns
            .into_iter()
            .filter_map(|(column, value)| {
                let value = value?.trim().to_string();
                (!value.is_empty()).then_some((column, value))
            })
            .collect();

        let expiration_date = match q.expiration_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                ApiError::Validation(format!(
                    "Invalid expirationDate '{raw}', expected YYYY-MM-DD"
                ))
            })?),
        };

        Ok(LicenseFilter {
            text,
            expiration_date,
        })
    }
}

pub async fn search_licenses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LicenseQuery>,
) -> ApiResult<Json<Vec<License>>> {
    let filter = LicenseFilter::try_from(query)?;
    let licenses = state.store.search_licenses(&filter).await?;
    info!(filters = filter.text.len(), count = licenses.len(), "License search");
    Ok(Json(licenses))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_maps_to_columns_and_skips_blanks() {
        let q = LicenseQuery {
            business_name: Some("Acme".into()),
            address_line1: Some("1 Main St".into()),
            city: Some("  ".into()),
            ..Default::default()
        };
        let filter = LicenseFilter::try_from(q).unwrap();
        assert_eq!(
            filter.text,
            vec![
                ("business_name", "Acme".to_string()),
                ("address_line_1", "1 Main St".to_string()),
            ]
        );
        assert!(filter.expiration_date.is_none());
    }

    #[test]
    fn expiration_date_must_be_iso() {
        let ok = LicenseQuery {
            expiration_date: Some("2025-06-30".into()),
            ..Default::default()
        };
        assert_eq!(
            LicenseFilter::try_from(ok).unwrap().expiration_date,
            NaiveDate::from_ymd_opt(2025, 6, 30)
        );

        let bad = LicenseQuery {
            expiration_date: Some("06/30/2025".into()),
            ..Default::default()
        };
        assert!(matches!(
            LicenseFilter::try_from(bad),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn contact_requires_core_fields() {
        let req: ContactRequest = serde_json::from_value(serde_json::json!({
            "county": "Alameda",
            "name": "DA Office",
            "address": "1225 Fallon St"
        }))
        .unwrap();
        match NewContact::try_from(req) {
            Err(ApiError::Validation(msg)) => assert_eq!(msg, "Missing required field: phone"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn optional_contact_fields_stay_none() {
        let req: ContactRequest = serde_json::from_value(serde_json::json!({
            "county": "Alameda",
            "name": "DA Office",
            "address": "1225 Fallon St",
            "phone": "510-272-6222",
            "fax": ""
        }))
        .unwrap();
        let contact = NewContact::try_from(req).unwrap();
        assert_eq!(contact.fax, None);
        assert_eq!(contact.link_to_website, None);
    }
}
