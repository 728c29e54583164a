pub mod error;
pub mod types;

pub use error::{BizfileError, Result};
pub use types::{BusinessEntity, BusinessSearchRequest, BusinessSearchResponse};

use reqwest::header::{HeaderMap, HeaderValue};

const BASE_URL: &str = "https://bizfileonline.sos.ca.gov";

/// Headers the search endpoint expects from its own web front end.
fn browser_headers() -> HeaderMap {
    let pairs: [(&str, &str); 14] = [
        (
            "User-Agent",
            "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0",
        ),
        ("Accept", "*/*"),
        ("Accept-Language", "en-US,en;q=0.5"),
        ("Referer", "https://bizfileonline.sos.ca.gov/search/business"),
        ("Authorization", "undefined"),
        ("Origin", "https://bizfileonline.sos.ca.gov"),
        ("Sec-GPC", "1"),
        ("Connection", "keep-alive"),
        ("Sec-Fetch-Dest", "empty"),
        ("Sec-Fetch-Mode", "cors"),
        ("Sec-Fetch-Site", "same-origin"),
        ("DNT", "1"),
        ("Pragma", "no-cache"),
        ("Cache-Control", "no-cache"),
    ];

    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        if let Ok(name) = reqwest::header::HeaderName::from_bytes(name.as_bytes()) {
            headers.insert(name, HeaderValue::from_static(value));
        }
    }
    headers
}

pub struct BizfileClient {
    client: reqwest::Client,
    base_url: String,
}

impl BizfileClient {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Keyword search over registered business entities.
    pub async fn search(&self, term: &str) -> Result<Vec<BusinessEntity>> {
        let url = format!("{}/api/Records/businesssearch", self.base_url);
        tracing::info!(term, "Searching CA business entities");

        let resp = self
            .client
            .post(&url)
            .headers(browser_headers())
            .json(&BusinessSearchRequest::keyword(term))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BizfileError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let parsed: BusinessSearchResponse = serde_json::from_str(&body)?;
        let entities: Vec<BusinessEntity> = parsed.rows.into_iter().map(Into::into).collect();
        tracing::info!(count = entities.len(), "Fetched business entities");

        Ok(entities)
    }
}

impl Default for BizfileClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_headers_are_all_valid() {
        let headers = browser_headers();
        assert_eq!(headers.len(), 14);
        assert_eq!(headers["origin"], "https://bizfileonline.sos.ca.gov");
    }
}
