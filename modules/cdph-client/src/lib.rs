pub mod error;
pub mod links;

pub use error::{CdphError, Result};
pub use links::RecallLink;

const SITE_URL: &str = "https://www.cdph.ca.gov";
const RECALLS_PATH: &str = "/Programs/CEH/DFDCS/Pages/FDBPrograms/DeviceRecalls.aspx";

/// The recall page rejects clients without a browser User-Agent.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

pub struct CdphClient {
    client: reqwest::Client,
    base_url: String,
}

impl CdphClient {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: SITE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Raw HTML of the device-recall page.
    pub async fn recall_page(&self) -> Result<String> {
        let url = format!("{}{}", self.base_url, RECALLS_PATH);
        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CdphError::Api {
                status: status.as_u16(),
                message: "Failed to retrieve data from the website.".to_string(),
            });
        }

        Ok(resp.text().await?)
    }

    /// Links on the recall page whose text or href mentions `device_name`
    /// or `firm_name` as a whole word. Blank terms are ignored.
    pub async fn search(&self, device_name: &str, firm_name: &str) -> Result<Vec<RecallLink>> {
        let matchers: Vec<_> = [device_name, firm_name]
            .into_iter()
            .map(links::word_matcher)
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect();

        let base = url::Url::parse(&self.base_url)
            .map_err(|e| CdphError::Network(format!("invalid base url: {e}")))?;

        let html = self.recall_page().await?;
        let anchors = links::extract_anchors(&html);
        let results = links::filter_links(anchors, &matchers, &base);
        tracing::info!(
            device_name,
            firm_name,
            matched = results.len(),
            "CDPH recall links matched"
        );

        Ok(results)
    }
}

impl Default for CdphClient {
    fn default() -> Self {
        Self::new()
    }
}
