pub mod error;
pub mod query;
pub mod types;

pub use error::{IndexError, Result};
pub use types::IndexedDocument;

/// Client for the `_search` endpoint of the historical-document index.
pub struct HistoricalIndexClient {
    client: reqwest::Client,
    search_url: String,
}

impl HistoricalIndexClient {
    /// `search_url` is the full `_search` URL, e.g.
    /// `http://localhost:9200/document-with-vector/_search`.
    pub fn new(search_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), search_url)
    }

    pub fn with_client(client: reqwest::Client, search_url: &str) -> Self {
        Self {
            client,
            search_url: search_url.to_string(),
        }
    }

    pub async fn search(&self, keyword: &str, year: Option<&str>) -> Result<Vec<IndexedDocument>> {
        let body = query::hybrid_query(keyword, year);
        tracing::info!(keyword, year = ?year, "Querying historical document index");

        let resp = self
            .client
            .post(&self.search_url)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(IndexError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        let parsed: types::SearchResponse = serde_json::from_str(&text)?;
        let docs: Vec<IndexedDocument> = parsed.hits.hits.iter().map(Into::into).collect();
        tracing::info!(count = docs.len(), "Fetched indexed documents");

        Ok(docs)
    }
}
