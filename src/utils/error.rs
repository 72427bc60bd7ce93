use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("{message}")]
    Validation { message: String },

    #[error("Contact not found: {key}")]
    NotFound { key: String },

    #[error("{matches} contacts are named '{name}', address the contact by id")]
    AmbiguousKey { name: String, matches: usize },

    #[error("{message}")]
    Unauthorized { message: String },

    /// Rejection returned by the identity provider, message passed through as-is.
    #[error("{message}")]
    Upstream { status: Option<u16>, message: String },

    #[error("Contact store error: {message}")]
    Store { message: String },

    #[error("Upload failed: {message}")]
    Upload { message: String },

    #[error("Upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },

    #[error("CSV exceeds the {limit} row limit")]
    RowLimitExceeded { limit: usize },

    #[error("Import timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    Processing { message: String },
}

impl ContactError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(key: impl ToString) -> Self {
        Self::NotFound {
            key: key.to_string(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContactError>;
