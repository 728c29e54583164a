// Trait seams for every upstream service a route calls.
//
// AppState holds each one as Arc<dyn Trait>. The live implementations wrap
// the client crates; `crate::testing` provides mocks so the router can be
// driven without network access.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use bizfile_client::{BizfileClient, BusinessEntity};
use cdph_client::{CdphClient, RecallLink};
use datadashboard_client::{ComplianceAction, DataDashboardClient};
use detector_client::DetectorClient;
use historical_index_client::{HistoricalIndexClient, IndexedDocument};
use openfda_client::{HistoricalDocument, OpenFdaClient, SearchQuery};
use serpapi_client::SerpApiClient;

// ---------------------------------------------------------------------------
// FdaSource: openFDA device collections
// ---------------------------------------------------------------------------

#[async_trait]
pub trait FdaSource: Send + Sync {
    async fn device_enforcement(&self, query: &SearchQuery) -> Result<Value>;

    async fn device_510k(&self, query: &SearchQuery) -> Result<Value>;

    async fn device_events(&self, query: &SearchQuery) -> Result<Value>;

    async fn historical_documents(&self, query: &SearchQuery) -> Result<Vec<HistoricalDocument>>;
}

#[async_trait]
impl FdaSource for OpenFdaClient {
    async fn device_enforcement(&self, query: &SearchQuery) -> Result<Value> {
        Ok(self.device_enforcement(query).await?)
    }

    async fn device_510k(&self, query: &SearchQuery) -> Result<Value> {
        Ok(self.device_510k(query).await?)
    }

    async fn device_events(&self, query: &SearchQuery) -> Result<Value> {
        Ok(self.device_events(query).await?)
    }

    async fn historical_documents(&self, query: &SearchQuery) -> Result<Vec<HistoricalDocument>> {
        Ok(self.historical_documents(query).await?)
    }
}

// ---------------------------------------------------------------------------
// ComplianceSource: FDA Data Dashboard
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ComplianceSource: Send + Sync {
    /// Warning letters for firms with this legal name, newest first.
    async fn warning_letters(&self, legal_name: &str) -> Result<Vec<ComplianceAction>>;
}

#[async_trait]
impl ComplianceSource for DataDashboardClient {
    async fn warning_letters(&self, legal_name: &str) -> Result<Vec<ComplianceAction>> {
        Ok(self.warning_letters(legal_name).await?)
    }
}

// ---------------------------------------------------------------------------
// RecallPageSource: CDPH device recalls
// ---------------------------------------------------------------------------

#[async_trait]
pub trait RecallPageSource: Send + Sync {
    async fn search(&self, device_name: &str, firm_name: &str) -> Result<Vec<RecallLink>>;
}

#[async_trait]
impl RecallPageSource for CdphClient {
    async fn search(&self, device_name: &str, firm_name: &str) -> Result<Vec<RecallLink>> {
        Ok(self.search(device_name, firm_name).await?)
    }
}

// ---------------------------------------------------------------------------
// BusinessRegistry: CA Secretary of State
// ---------------------------------------------------------------------------

#[async_trait]
pub trait BusinessRegistry: Send + Sync {
    async fn search(&self, term: &str) -> Result<Vec<BusinessEntity>>;
}

#[async_trait]
impl BusinessRegistry for BizfileClient {
    async fn search(&self, term: &str) -> Result<Vec<BusinessEntity>> {
        Ok(self.search(term).await?)
    }
}

// ---------------------------------------------------------------------------
// HistoricalIndex: hybrid search over historical documents
// ---------------------------------------------------------------------------

#[async_trait]
pub trait HistoricalIndex: Send + Sync {
    async fn search(&self, keyword: &str, year: Option<&str>) -> Result<Vec<IndexedDocument>>;
}

#[async_trait]
impl HistoricalIndex for HistoricalIndexClient {
    async fn search(&self, keyword: &str, year: Option<&str>) -> Result<Vec<IndexedDocument>> {
        Ok(self.search(keyword, year).await?)
    }
}

// ---------------------------------------------------------------------------
// ReverseImageSearch: SerpApi
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ReverseImageSearch: Send + Sync {
    /// Label for the image at `image_url`, `None` if it was not recognized.
    async fn identify(&self, image_url: &str) -> Result<Option<String>>;
}

#[async_trait]
impl ReverseImageSearch for SerpApiClient {
    async fn identify(&self, image_url: &str) -> Result<Option<String>> {
        Ok(self.reverse_image(image_url).await?.query_displayed())
    }
}

// ---------------------------------------------------------------------------
// ObjectDetector: model server
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ObjectDetector: Send + Sync {
    /// Annotated image for the given image bytes.
    async fn annotate(&self, image: Vec<u8>) -> Result<Vec<u8>>;
}

#[async_trait]
impl ObjectDetector for DetectorClient {
    async fn annotate(&self, image: Vec<u8>) -> Result<Vec<u8>> {
        Ok(self.annotate(image).await?)
    }
}
