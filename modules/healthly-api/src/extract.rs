use std::fmt;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ApiError;

/// JSON request body. An empty body reads as `T::default()` so the route's
/// own required-field check produces the error.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::Validation(format!("Invalid JSON body: {e}")))
    }
}

/// Optional text field. Numbers and booleans are read as their JSON text;
/// `null` and missing are blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text(Option<String>);

impl Text {
    /// Trimmed value, `""` when absent.
    pub fn as_str(&self) -> &str {
        self.0.as_deref().map(str::trim).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Trimmed value, `None` when blank.
    pub fn value(&self) -> Option<String> {
        let s = self.as_str();
        (!s.is_empty()).then(|| s.to_string())
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text(Some(s.to_string()))
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Text(None)),
            Value::String(s) => Ok(Text(Some(s))),
            Value::Number(n) => Ok(Text(Some(n.to_string()))),
            Value::Bool(b) => Ok(Text(Some(b.to_string()))),
            other => Err(serde::de::Error::custom(format!(
                "expected a string, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    struct Body {
        keyword: Text,
        year: Text,
    }

    #[test]
    fn reads_strings_numbers_and_null() {
        let body: Body = serde_json::from_str(r#"{"keyword": " pump ", "year": 1978}"#).unwrap();
        assert_eq!(body.keyword.as_str(), "pump");
        assert_eq!(body.year.as_str(), "1978");

        let body: Body = serde_json::from_str(r#"{"keyword": null}"#).unwrap();
        assert!(body.keyword.is_blank());
        assert!(body.year.value().is_none());
    }

    #[test]
    fn rejects_nested_values() {
        assert!(serde_json::from_str::<Body>(r#"{"keyword": ["a"]}"#).is_err());
    }
}
