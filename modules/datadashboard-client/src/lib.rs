pub mod error;
pub mod types;

pub use error::{DashboardError, Result};
pub use types::{
    CaseInjunctionId, ComplianceAction, ComplianceActionsRequest, ComplianceActionsResponse,
};

const BASE_URL: &str = "https://api-datadashboard.fda.gov/v1";

/// Rows requested per warning-letter search.
pub const WARNING_LETTER_ROWS: u32 = 50;

pub struct DataDashboardClient {
    client: reqwest::Client,
    base_url: String,
    user: Option<String>,
    key: Option<String>,
}

impl DataDashboardClient {
    pub fn new(user: Option<String>, key: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), user, key)
    }

    pub fn with_client(client: reqwest::Client, user: Option<String>, key: Option<String>) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
            user,
            key,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub async fn compliance_actions(
        &self,
        request: &ComplianceActionsRequest,
    ) -> Result<ComplianceActionsResponse> {
        let url = format!("{}/compliance_actions", self.base_url);

        let mut builder = self.client.post(&url).json(request);
        if let Some(ref user) = self.user {
            builder = builder.header("Authorization-User", user);
        }
        if let Some(ref key) = self.key {
            builder = builder.header("Authorization-Key", key);
        }

        let resp = builder.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DashboardError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Warning letters issued to firms whose legal name matches `legal_name`.
    pub async fn warning_letters(&self, legal_name: &str) -> Result<Vec<ComplianceAction>> {
        tracing::info!(legal_name, "Searching compliance actions for warning letters");

        let request = ComplianceActionsRequest::warning_letters(legal_name, WARNING_LETTER_ROWS);
        let resp = self.compliance_actions(&request).await?;
        let total = resp.total_count;
        let received = resp.result.len();
        let actions = resp.into_actions();
        tracing::info!(
            received,
            kept = actions.len(),
            total = ?total,
            "Fetched compliance actions"
        );

        Ok(actions)
    }
}
