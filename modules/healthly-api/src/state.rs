use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use bizfile_client::BizfileClient;
use cdph_client::CdphClient;
use datadashboard_client::DataDashboardClient;
use detector_client::DetectorClient;
use healthly_common::{redact_secrets, AppConfig};
use historical_index_client::HistoricalIndexClient;
use openfda_client::OpenFdaClient;
use serpapi_client::SerpApiClient;

use crate::error::ApiError;
use crate::jwt::{JwtService, ISSUER};
use crate::store::Store;
use crate::traits::{
    BusinessRegistry, ComplianceSource, FdaSource, HistoricalIndex, ObjectDetector,
    RecallPageSource, ReverseImageSearch,
};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// One handle per upstream service.
#[derive(Clone)]
pub struct Upstreams {
    pub fda: Arc<dyn FdaSource>,
    pub compliance: Arc<dyn ComplianceSource>,
    pub recalls: Arc<dyn RecallPageSource>,
    pub registry: Arc<dyn BusinessRegistry>,
    /// Present only when a search index is configured.
    pub historical_index: Option<Arc<dyn HistoricalIndex>>,
    pub reverse_image: Arc<dyn ReverseImageSearch>,
    pub detector: Arc<dyn ObjectDetector>,
}

impl Upstreams {
    /// Live clients sharing one HTTP connection pool.
    pub fn live(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

        let historical_index = config.historical_index_url.as_deref().map(|url| {
            Arc::new(HistoricalIndexClient::with_client(client.clone(), url))
                as Arc<dyn HistoricalIndex>
        });

        Ok(Self {
            fda: Arc::new(OpenFdaClient::with_client(
                client.clone(),
                config.fda_api_key.clone().unwrap_or_default(),
            )),
            compliance: Arc::new(DataDashboardClient::with_client(
                client.clone(),
                config.dashboard_user.clone(),
                config.dashboard_key.clone(),
            )),
            recalls: Arc::new(CdphClient::with_client(client.clone())),
            registry: Arc::new(BizfileClient::with_client(client.clone())),
            historical_index,
            reverse_image: Arc::new(SerpApiClient::with_client(
                client.clone(),
                config.serp_api_key.clone().unwrap_or_default(),
            )),
            detector: Arc::new(DetectorClient::with_client(client, config.detector_url.clone())),
        })
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub upstreams: Upstreams,
    pub store: Arc<dyn Store>,
    pub jwt: JwtService,
    secrets: Vec<String>,
}

impl AppState {
    pub fn new(config: AppConfig, upstreams: Upstreams, store: Arc<dyn Store>) -> Self {
        let jwt = JwtService::new(&config.jwt_secret, ISSUER.to_string());
        let secrets = config.secrets();
        Self {
            config,
            upstreams,
            store,
            jwt,
            secrets,
        }
    }

    /// Fails with `API key is missing` when no openFDA key is configured.
    pub fn require_fda_key(&self) -> Result<(), ApiError> {
        match self.config.fda_api_key {
            Some(_) => Ok(()),
            None => Err(ApiError::MissingCredential("API key")),
        }
    }

    /// Text with every configured credential replaced by `<HIDDEN>`.
    pub fn redact(&self, text: &str) -> String {
        redact_secrets(text, &self.secrets)
    }

    /// Log an upstream failure and turn it into the error envelope. The
    /// logged and returned details are the same redacted string.
    pub fn upstream_error(&self, route: &str, message: &str, err: anyhow::Error) -> ApiError {
        let details = self.redact(&format!("{err:#}"));
        tracing::error!(route, details = %details, "{message}");
        ApiError::Upstream {
            message: message.to_string(),
            details,
        }
    }
}
