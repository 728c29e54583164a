use thiserror::Error;

pub type Result<T> = std::result::Result<T, BizfileError>;

#[derive(Debug, Error)]
pub enum BizfileError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for BizfileError {
    fn from(err: reqwest::Error) -> Self {
        BizfileError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for BizfileError {
    fn from(err: serde_json::Error) -> Self {
        BizfileError::Parse(err.to_string())
    }
}
