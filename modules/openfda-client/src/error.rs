use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpenFdaError>;

#[derive(Debug, Error)]
pub enum OpenFdaError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for OpenFdaError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the api_key query parameter.
        OpenFdaError::Network(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for OpenFdaError {
    fn from(err: serde_json::Error) -> Self {
        OpenFdaError::Parse(err.to_string())
    }
}
