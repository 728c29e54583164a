use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder for a field the index did not return.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Hits,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// One hit. With `_source: false` values arrive as arrays under `fields`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hit {
    #[serde(default)]
    pub fields: HashMap<String, Vec<Value>>,
}

impl Hit {
    fn first(&self, name: &str) -> Value {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .cloned()
            .unwrap_or_else(|| Value::String(NOT_AVAILABLE.to_string()))
    }
}

/// Historical document as returned by the index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedDocument {
    pub num_of_pages: Value,
    pub year: Value,
    pub text: Value,
    pub doc_type: Value,
}

impl From<&Hit> for IndexedDocument {
    fn from(hit: &Hit) -> Self {
        Self {
            num_of_pages: hit.first("num_of_pages"),
            year: hit.first("year"),
            text: hit.first("text"),
            doc_type: hit.first("doc_type"),
        }
    }
}
