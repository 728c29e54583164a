pub mod error;

pub use error::{Result, SerpApiError};

use serde::Deserialize;

const BASE_URL: &str = "https://serpapi.com";
const REVERSE_IMAGE_ENGINE: &str = "google_reverse_image";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReverseImageResponse {
    #[serde(default)]
    pub search_information: Option<SearchInformation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchInformation {
    #[serde(default)]
    pub query_displayed: Option<String>,
}

impl ReverseImageResponse {
    /// The label Google shows for the image, if it recognized one.
    pub fn query_displayed(self) -> Option<String> {
        self.search_information?.query_displayed
    }
}

pub struct SerpApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SerpApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_key)
    }

    pub fn with_client(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Reverse-image search for a publicly reachable image URL.
    pub async fn reverse_image(&self, image_url: &str) -> Result<ReverseImageResponse> {
        let url = format!("{}/search.json", self.base_url);
        tracing::info!(image_url, "Running reverse image search");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("engine", REVERSE_IMAGE_ENGINE),
                ("image_url", image_url),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SerpApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_query_displayed() {
        let resp: ReverseImageResponse = serde_json::from_value(serde_json::json!({
            "search_metadata": {"status": "Success"},
            "search_information": {"query_displayed": "stethoscope", "total_results": 10}
        }))
        .unwrap();
        assert_eq!(resp.query_displayed().as_deref(), Some("stethoscope"));
    }

    #[test]
    fn missing_search_information_is_none() {
        let resp: ReverseImageResponse =
            serde_json::from_value(serde_json::json!({"image_results": []})).unwrap();
        assert!(resp.query_displayed().is_none());

        let resp: ReverseImageResponse =
            serde_json::from_value(serde_json::json!({"search_information": {}})).unwrap();
        assert!(resp.query_displayed().is_none());
    }
}
