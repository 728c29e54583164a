use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /api/Records/businesssearch`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct BusinessSearchRequest {
    pub search_value: String,
    /// `"1"` is the keyword search.
    pub search_type_id: String,
}

impl BusinessSearchRequest {
    pub fn keyword(term: &str) -> Self {
        Self {
            search_value: term.to_string(),
            search_type_id: "1".to_string(),
        }
    }
}

/// Search response. `rows` is an object keyed by record id; upstream order
/// is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessSearchResponse {
    #[serde(default, deserialize_with = "ordered_rows")]
    pub rows: Vec<BusinessRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct BusinessRow {
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub filing_date: Value,
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub entity_type: Value,
    #[serde(default)]
    pub formed_in: Value,
    #[serde(default)]
    pub agent: Value,
}

/// Flattened business entity as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessEntity {
    pub entity_information: Option<String>,
    pub initial_filing_date: Value,
    pub status: Value,
    pub entity_type: Value,
    pub formed_in: Value,
    pub agent: Value,
}

impl From<BusinessRow> for BusinessEntity {
    fn from(row: BusinessRow) -> Self {
        Self {
            entity_information: row.title.into_iter().next(),
            initial_filing_date: row.filing_date,
            status: row.status,
            entity_type: row.entity_type,
            formed_in: row.formed_in,
            agent: row.agent,
        }
    }
}

fn ordered_rows<'de, D>(deserializer: D) -> Result<Vec<BusinessRow>, D::Error>
where
    D: Deserializer<'de>,
{
    struct RowsVisitor;

    impl<'de> Visitor<'de> for RowsVisitor {
        type Value = Vec<BusinessRow>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object of business rows")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut rows = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((_id, row)) = map.next_entry::<String, BusinessRow>()? {
                rows.push(row);
            }
            Ok(rows)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(RowsVisitor)
}
