use std::path::PathBuf;

use anyhow::Result;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Database
    pub database_url: String,

    // Server
    pub host: String,
    pub port: u16,
    pub public_base_url: String,

    // openFDA
    pub fda_api_key: Option<String>,

    // FDA Data Dashboard
    pub dashboard_user: Option<String>,
    pub dashboard_key: Option<String>,

    // Image search / detection
    pub serp_api_key: Option<String>,
    pub detector_url: Option<String>,

    // Historical documents search index
    pub historical_index_url: Option<String>,

    // Uploads
    pub upload_dir: PathBuf,
    pub upload_retention_secs: u64,
    pub allowed_extensions: Vec<String>,
    pub max_upload_bytes: usize,

    // Auth
    pub jwt_secret: String,

    // CORS
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")?,
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "80".to_string())
                .parse()?,
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "https://api.healthly.dev".to_string())
                .trim_end_matches('/')
                .to_string(),
            fda_api_key: optional_env("FDA_API_KEY"),
            dashboard_user: optional_env("AUTHORIZATION_USER"),
            dashboard_key: optional_env("AUTHORIZATION_KEY"),
            serp_api_key: optional_env("SERP_API_KEY"),
            detector_url: optional_env("DETECTOR_URL"),
            historical_index_url: optional_env("HISTORICAL_INDEX_URL"),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "/uploads".to_string())
                .into(),
            upload_retention_secs: std::env::var("UPLOAD_RETENTION_SECS")
                .unwrap_or_else(|_| (3 * 86_400).to_string())
                .parse()?,
            allowed_extensions: parse_list(
                &std::env::var("ALLOWED_EXTENSIONS").unwrap_or_else(|_| "png,jpg,jpeg".to_string()),
            )
            .into_iter()
            .map(|ext| ext.to_lowercase())
            .collect(),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (16 * 1024 * 1024).to_string())
                .parse()?,
            jwt_secret: std::env::var("JWT_SECRET")?,
            allowed_origins: parse_list(&std::env::var("ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }

    /// Every configured credential. Used to scrub upstream error details.
    pub fn secrets(&self) -> Vec<String> {
        [
            &self.fda_api_key,
            &self.dashboard_user,
            &self.dashboard_key,
            &self.serp_api_key,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }
}

/// Unset and blank variables are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
