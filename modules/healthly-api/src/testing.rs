// Test doubles for the router.
//
// One mock per upstream trait, plus an in-memory Store. Each mock returns a
// canned value or a canned failure and records what it was asked, so tests
// can assert on both the response and the upstream call.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::Value;

use bizfile_client::BusinessEntity;
use cdph_client::RecallLink;
use datadashboard_client::{ComplianceAction, ComplianceActionsResponse};
use healthly_common::AppConfig;
use historical_index_client::IndexedDocument;
use openfda_client::{Endpoint, HistoricalDocument, SearchQuery};

use crate::state::{AppState, Upstreams};
use crate::store::{Contact, License, LicenseFilter, NewContact, Store, User};
use crate::traits::{
    BusinessRegistry, ComplianceSource, FdaSource, HistoricalIndex, ObjectDetector,
    RecallPageSource, ReverseImageSearch,
};

// ---------------------------------------------------------------------------
// Test constants
// ---------------------------------------------------------------------------

pub const TEST_FDA_KEY: &str = "fda-test-key-123";
pub const TEST_DASHBOARD_KEY: &str = "dash-test-key-456";
pub const TEST_SERP_KEY: &str = "serp-test-key-789";
pub const TEST_JWT_SECRET: &str = "jwt-test-secret";
pub const TEST_PUBLIC_BASE_URL: &str = "https://api.test.healthly.dev";

/// Config with every credential set and uploads under `upload_dir`.
pub fn test_config(upload_dir: &Path) -> AppConfig {
    AppConfig {
        database_url: "postgres://localhost/healthly_test".into(),
        host: "127.0.0.1".into(),
        port: 0,
        public_base_url: TEST_PUBLIC_BASE_URL.into(),
        fda_api_key: Some(TEST_FDA_KEY.into()),
        dashboard_user: Some("dash-user".into()),
        dashboard_key: Some(TEST_DASHBOARD_KEY.into()),
        serp_api_key: Some(TEST_SERP_KEY.into()),
        detector_url: Some("http://detector.test/predict".into()),
        historical_index_url: None,
        upload_dir: upload_dir.to_path_buf(),
        upload_retention_secs: 3 * 86_400,
        allowed_extensions: vec!["png".into(), "jpg".into(), "jpeg".into()],
        max_upload_bytes: 16 * 1024 * 1024,
        jwt_secret: TEST_JWT_SECRET.into(),
        allowed_origins: vec![],
    }
}

// ---------------------------------------------------------------------------
// MockFda
// ---------------------------------------------------------------------------

/// Returns `response` for every device collection and `documents` for the
/// historical collection. Records `(endpoint, search)` for each call.
#[derive(Default)]
pub struct MockFda {
    response: Value,
    documents: Vec<HistoricalDocument>,
    error: Option<String>,
    calls: Mutex<Vec<(Endpoint, String)>>,
}

impl MockFda {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, response: Value) -> Self {
        self.response = response;
        self
    }

    pub fn with_documents(mut self, documents: Vec<HistoricalDocument>) -> Self {
        self.documents = documents;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.error = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(Endpoint, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, endpoint: Endpoint, query: &SearchQuery) -> Result<()> {
        self.calls.lock().unwrap().push((endpoint, query.to_string()));
        if let Some(ref msg) = self.error {
            bail!("{msg}");
        }
        Ok(())
    }
}

#[async_trait]
impl FdaSource for MockFda {
    async fn device_enforcement(&self, query: &SearchQuery) -> Result<Value> {
        self.record(Endpoint::DeviceEnforcement, query)?;
        Ok(self.response.clone())
    }

    async fn device_510k(&self, query: &SearchQuery) -> Result<Value> {
        self.record(Endpoint::Device510k, query)?;
        Ok(self.response.clone())
    }

    async fn device_events(&self, query: &SearchQuery) -> Result<Value> {
        self.record(Endpoint::DeviceEvent, query)?;
        Ok(self.response.clone())
    }

    async fn historical_documents(&self, query: &SearchQuery) -> Result<Vec<HistoricalDocument>> {
        self.record(Endpoint::HistoricalDocument, query)?;
        Ok(self.documents.clone())
    }
}

// ---------------------------------------------------------------------------
// MockCompliance
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockCompliance {
    actions: Vec<ComplianceAction>,
    error: Option<String>,
    firms: Mutex<Vec<String>>,
}

impl MockCompliance {
    pub fn new(actions: Vec<ComplianceAction>) -> Self {
        Self {
            actions,
            ..Default::default()
        }
    }

    /// Actions read from a raw Data Dashboard response body, the same way
    /// the live client reads them.
    pub fn from_feed(body: Value) -> Self {
        let response: ComplianceActionsResponse =
            serde_json::from_value(body).expect("feed body is a response envelope");
        Self::new(response.into_actions())
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Default::default()
        }
    }

    /// Legal names searched, in call order.
    pub fn firms(&self) -> Vec<String> {
        self.firms.lock().unwrap().clone()
    }
}

#[async_trait]
impl ComplianceSource for MockCompliance {
    async fn warning_letters(&self, legal_name: &str) -> Result<Vec<ComplianceAction>> {
        self.firms.lock().unwrap().push(legal_name.to_string());
        if let Some(ref msg) = self.error {
            bail!("{msg}");
        }
        Ok(self.actions.clone())
    }
}

// ---------------------------------------------------------------------------
// MockRecallPage / MockBusinessRegistry
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockRecallPage {
    links: Vec<RecallLink>,
    error: Option<String>,
}

impl MockRecallPage {
    pub fn new(links: Vec<RecallLink>) -> Self {
        Self { links, error: None }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            links: Vec::new(),
            error: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl RecallPageSource for MockRecallPage {
    async fn search(&self, _device_name: &str, _firm_name: &str) -> Result<Vec<RecallLink>> {
        if let Some(ref msg) = self.error {
            bail!("{msg}");
        }
        Ok(self.links.clone())
    }
}

#[derive(Default)]
pub struct MockBusinessRegistry {
    entities: Vec<BusinessEntity>,
    terms: Mutex<Vec<String>>,
}

impl MockBusinessRegistry {
    pub fn new(entities: Vec<BusinessEntity>) -> Self {
        Self {
            entities,
            terms: Mutex::new(Vec::new()),
        }
    }

    pub fn terms(&self) -> Vec<String> {
        self.terms.lock().unwrap().clone()
    }
}

#[async_trait]
impl BusinessRegistry for MockBusinessRegistry {
    async fn search(&self, term: &str) -> Result<Vec<BusinessEntity>> {
        self.terms.lock().unwrap().push(term.to_string());
        Ok(self.entities.clone())
    }
}

// ---------------------------------------------------------------------------
// MockHistoricalIndex
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockHistoricalIndex {
    documents: Vec<IndexedDocument>,
    error: Option<String>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl MockHistoricalIndex {
    pub fn new(documents: Vec<IndexedDocument>) -> Self {
        Self {
            documents,
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoricalIndex for MockHistoricalIndex {
    async fn search(&self, keyword: &str, year: Option<&str>) -> Result<Vec<IndexedDocument>> {
        self.calls
            .lock()
            .unwrap()
            .push((keyword.to_string(), year.map(String::from)));
        if let Some(ref msg) = self.error {
            bail!("{msg}");
        }
        Ok(self.documents.clone())
    }
}

// ---------------------------------------------------------------------------
// MockReverseImage / MockDetector
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockReverseImage {
    label: Option<String>,
    error: Option<String>,
    urls: Mutex<Vec<String>>,
}

impl MockReverseImage {
    pub fn recognizing(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            ..Default::default()
        }
    }

    pub fn unrecognized() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReverseImageSearch for MockReverseImage {
    async fn identify(&self, image_url: &str) -> Result<Option<String>> {
        self.urls.lock().unwrap().push(image_url.to_string());
        if let Some(ref msg) = self.error {
            bail!("{msg}");
        }
        Ok(self.label.clone())
    }
}

/// Echoes the input reversed, or fails.
#[derive(Default)]
pub struct MockDetector {
    error: Option<String>,
}

impl MockDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl ObjectDetector for MockDetector {
    async fn annotate(&self, mut image: Vec<u8>) -> Result<Vec<u8>> {
        if let Some(ref msg) = self.error {
            bail!("{msg}");
        }
        image.reverse();
        Ok(image)
    }
}

// ---------------------------------------------------------------------------
// InMemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryStore {
    contacts: Mutex<Vec<Contact>>,
    licenses: Mutex<Vec<License>>,
    users: Mutex<Vec<User>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_licenses(self, licenses: Vec<License>) -> Self {
        *self.licenses.lock().unwrap() = licenses;
        self
    }

    pub fn users(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        Ok(self.contacts.lock().unwrap().clone())
    }

    async fn insert_contact(&self, contact: NewContact) -> Result<Contact> {
        let mut contacts = self.contacts.lock().unwrap();
        let stored = Contact {
            id: contacts.len() as i64 + 1,
            county: contact.county,
            name: contact.name,
            address: contact.address,
            phone: contact.phone,
            fax: contact.fax,
            link_to_website: contact.link_to_website,
        };
        contacts.push(stored.clone());
        Ok(stored)
    }

    async fn search_licenses(&self, filter: &LicenseFilter) -> Result<Vec<License>> {
        let mut found: Vec<License> = self
            .licenses
            .lock()
            .unwrap()
            .iter()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        found.sort_by_key(|l| l.license_address_id);
        Ok(found)
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<bool> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == username) {
            return Ok(false);
        }
        let id = users.len() as i64 + 1;
        users.push(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        });
        Ok(true)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// Mocks with empty canned data and no search index configured.
pub fn mock_upstreams() -> Upstreams {
    Upstreams {
        fda: Arc::new(MockFda::new()),
        compliance: Arc::new(MockCompliance::default()),
        recalls: Arc::new(MockRecallPage::default()),
        registry: Arc::new(MockBusinessRegistry::default()),
        historical_index: None,
        reverse_image: Arc::new(MockReverseImage::unrecognized()),
        detector: Arc::new(MockDetector::new()),
    }
}

pub fn test_state(config: AppConfig, upstreams: Upstreams, store: Arc<dyn Store>) -> Arc<AppState> {
    Arc::new(AppState::new(config, upstreams, store))
}
