use serde::Deserialize;
use serde_json::Value;

/// openFDA collections this client can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Device recall enforcement reports.
    DeviceEnforcement,
    /// 510(k) premarket notifications.
    Device510k,
    /// MAUDE adverse event reports.
    DeviceEvent,
    /// Historical FDA documents.
    HistoricalDocument,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::DeviceEnforcement => "device/enforcement.json",
            Endpoint::Device510k => "device/510k.json",
            Endpoint::DeviceEvent => "device/event.json",
            Endpoint::HistoricalDocument => "other/historicaldocument.json",
        }
    }
}

/// Standard openFDA envelope. Only `results` is interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse<T> {
    #[serde(default)]
    pub meta: Option<Value>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// One record of `other/historicaldocument.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalDocument {
    pub num_of_pages: Option<Value>,
    pub year: Option<Value>,
    pub text: Option<String>,
    pub doc_type: Option<String>,
    pub download_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn historical_response_ignores_unknown_fields() {
        let body = serde_json::json!({
            "meta": {"results": {"total": 1}},
            "results": [{
                "num_of_pages": 10,
                "year": 1978,
                "text": "Sample document text",
                "doc_type": "pr",
                "unexpected": true
            }]
        });
        let parsed: SearchResponse<HistoricalDocument> = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].year, Some(serde_json::json!(1978)));
        assert_eq!(parsed.results[0].doc_type.as_deref(), Some("pr"));
        assert!(parsed.results[0].download_url.is_none());
    }

    #[test]
    fn missing_results_is_empty() {
        let parsed: SearchResponse<HistoricalDocument> =
            serde_json::from_value(serde_json::json!({"meta": {}})).unwrap();
        assert!(parsed.results.is_empty());
    }
}
