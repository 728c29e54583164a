pub mod error;
pub mod query;
pub mod types;

pub use error::{OpenFdaError, Result};
pub use query::SearchQuery;
pub use types::{Endpoint, HistoricalDocument, SearchResponse};

use serde::de::DeserializeOwned;
use serde_json::Value;

const BASE_URL: &str = "https://api.fda.gov";

/// Page size requested from every openFDA collection.
pub const DEFAULT_LIMIT: u32 = 100;

pub struct OpenFdaClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenFdaClient {
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

    /// Run a search against one collection and decode the body as `T`.
    pub async fn search<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &SearchQuery,
        limit: u32,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        let search = query.to_string();
        let limit_param = limit.to_string();
        tracing::info!(endpoint = endpoint.path(), search = %search, limit, "Querying openFDA");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("search", search.as_str()),
                ("limit", limit_param.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OpenFdaError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Device recall enforcement reports, returned as-is.
    pub async fn device_enforcement(&self, query: &SearchQuery) -> Result<Value> {
        self.search(Endpoint::DeviceEnforcement, query, DEFAULT_LIMIT)
            .await
    }

    /// 510(k) clearances, returned as-is.
    pub async fn device_510k(&self, query: &SearchQuery) -> Result<Value> {
        self.search(Endpoint::Device510k, query, DEFAULT_LIMIT).await
    }

    /// MAUDE adverse event reports, returned as-is.
    pub async fn device_events(&self, query: &SearchQuery) -> Result<Value> {
        self.search(Endpoint::DeviceEvent, query, DEFAULT_LIMIT).await
    }

    pub async fn historical_documents(&self, query: &SearchQuery) -> Result<Vec<HistoricalDocument>> {
        let resp: SearchResponse<HistoricalDocument> = self
            .search(Endpoint::HistoricalDocument, query, DEFAULT_LIMIT)
            .await?;
        tracing::info!(count = resp.results.len(), "Fetched historical documents");
        Ok(resp.results)
    }
}
