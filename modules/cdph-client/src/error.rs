use thiserror::Error;

pub type Result<T> = std::result::Result<T, CdphError>;

#[derive(Debug, Error)]
pub enum CdphError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid search term: {0}")]
    Pattern(String),
}

impl From<reqwest::Error> for CdphError {
    fn from(err: reqwest::Error) -> Self {
        CdphError::Network(err.to_string())
    }
}

impl From<regex::Error> for CdphError {
    fn from(err: regex::Error) -> Self {
        CdphError::Pattern(err.to_string())
    }
}
