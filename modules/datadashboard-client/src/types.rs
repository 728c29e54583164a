use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Columns requested for every compliance action.
pub const COMPLIANCE_COLUMNS: &[&str] = &[
    "FirmProfile",
    "FEINumber",
    "ActionType",
    "State",
    "ActionTakenDate",
    "LegalName",
    "CaseInjunctionID",
];

/// Body of `POST /v1/compliance_actions`.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceActionsRequest {
    pub start: u32,
    pub rows: u32,
    pub returntotalcount: String,
    pub sort: String,
    pub sortorder: String,
    pub filters: BTreeMap<String, Vec<String>>,
    pub columns: Vec<String>,
}

impl ComplianceActionsRequest {
    /// Most recent biologics and device warning letters for a legal name.
    pub fn warning_letters(legal_name: &str, rows: u32) -> Self {
        let filters = BTreeMap::from([
            (
                "ProductType".to_string(),
                vec!["Biologics".to_string(), "Devices".to_string()],
            ),
            ("ActionType".to_string(), vec!["Warning Letter".to_string()]),
            ("LegalName".to_string(), vec![legal_name.to_string()]),
        ]);

        Self {
            start: 1,
            rows,
            returntotalcount: "true".to_string(),
            sort: "ActionTakenDate".to_string(),
            sortorder: "DESC".to_string(),
            filters,
            columns: COMPLIANCE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Response envelope. Records have been observed under both `result` and
/// `results`. Records are kept raw so one oddly typed row cannot fail the
/// whole page; see [`ComplianceActionsResponse::into_actions`].
#[derive(Debug, Clone, Deserialize)]
pub struct ComplianceActionsResponse {
    #[serde(default, alias = "results")]
    pub result: Vec<Value>,
    #[serde(default, rename = "totalcount")]
    pub total_count: Option<u64>,
}

impl ComplianceActionsResponse {
    /// Typed records in feed order. Rows that do not fit [`ComplianceAction`]
    /// are logged and skipped.
    pub fn into_actions(self) -> Vec<ComplianceAction> {
        self.result
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value(row) {
                Ok(action) => Some(action),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping malformed compliance action");
                    None
                }
            })
            .collect()
    }
}

/// Case/injunction identifier; the feed sends it as a number or a string.
/// Numbers keep their JSON form, so `2.0` stays `2.0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaseInjunctionId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for CaseInjunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseInjunctionId::Number(n) => write!(f, "{n}"),
            CaseInjunctionId::Text(s) => f.write_str(s),
        }
    }
}

/// One compliance action row. Field names follow the feed. Only the three
/// columns used to build letter URLs are typed; the rest pass through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceAction {
    #[serde(rename = "FirmProfile", default, skip_serializing_if = "Option::is_none")]
    pub firm_profile: Option<Value>,
    #[serde(rename = "FEINumber", default, skip_serializing_if = "Option::is_none")]
    pub fei_number: Option<Value>,
    #[serde(rename = "ActionType", default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<Value>,
    #[serde(rename = "State", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(rename = "ActionTakenDate", default, skip_serializing_if = "Option::is_none")]
    pub action_taken_date: Option<String>,
    #[serde(rename = "LegalName", default, skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    #[serde(rename = "CaseInjunctionID", default, skip_serializing_if = "Option::is_none")]
    pub case_injunction_id: Option<CaseInjunctionId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_letter_request_matches_dashboard_shape() {
        let body = serde_json::to_value(ComplianceActionsRequest::warning_letters("Acme", 50)).unwrap();
        assert_eq!(body["start"], 1);
        assert_eq!(body["rows"], 50);
        assert_eq!(body["returntotalcount"], "true");
        assert_eq!(body["sortorder"], "DESC");
        assert_eq!(body["filters"]["LegalName"], serde_json::json!(["Acme"]));
        assert_eq!(body["filters"]["ProductType"], serde_json::json!(["Biologics", "Devices"]));
        assert_eq!(body["columns"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn reads_result_and_results_keys() {
        let singular: ComplianceActionsResponse = serde_json::from_value(serde_json::json!({
            "result": [{"LegalName": "Acme"}]
        }))
        .unwrap();
        let plural: ComplianceActionsResponse = serde_json::from_value(serde_json::json!({
            "results": [{"LegalName": "Acme"}]
        }))
        .unwrap();
        assert_eq!(singular.result, plural.result);
        assert_eq!(singular.into_actions().len(), 1);
    }

    #[test]
    fn oddly_typed_rows_do_not_fail_the_page() {
        let resp: ComplianceActionsResponse = serde_json::from_value(serde_json::json!({
            "result": [
                {"CaseInjunctionID": 1, "LegalName": "Alpha", "FirmProfile": 5},
                {"CaseInjunctionID": 2.0, "LegalName": "Beta"},
                {"CaseInjunctionID": true, "LegalName": "Gamma"},
                {"CaseInjunctionID": 4, "LegalName": ["Delta"]}
            ]
        }))
        .unwrap();
        let actions = resp.into_actions();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].firm_profile, Some(serde_json::json!(5)));
        assert_eq!(actions[1].case_injunction_id.as_ref().unwrap().to_string(), "2.0");
        assert_eq!(actions[1].legal_name.as_deref(), Some("Beta"));
    }

    #[test]
    fn case_id_accepts_number_or_string() {
        let action: ComplianceAction = serde_json::from_value(serde_json::json!({
            "CaseInjunctionID": 12345
        }))
        .unwrap();
        assert_eq!(action.case_injunction_id.unwrap().to_string(), "12345");

        let action: ComplianceAction = serde_json::from_value(serde_json::json!({
            "CaseInjunctionID": "A-99"
        }))
        .unwrap();
        assert_eq!(action.case_injunction_id.unwrap().to_string(), "A-99");
    }

    #[test]
    fn unknown_fields_are_ignored_and_absent_fields_not_serialized() {
        let action: ComplianceAction = serde_json::from_value(serde_json::json!({
            "LegalName": "Acme",
            "ProductType": "Devices"
        }))
        .unwrap();
        let out = serde_json::to_value(&action).unwrap();
        assert_eq!(out, serde_json::json!({"LegalName": "Acme"}));
    }
}
