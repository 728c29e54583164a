pub mod config;
pub mod error;
pub mod warning_letter;

pub use config::AppConfig;
pub use error::{redact_secrets, REDACTED};
pub use warning_letter::{normalize_legal_name, warning_letter_url, DateFormatError};
