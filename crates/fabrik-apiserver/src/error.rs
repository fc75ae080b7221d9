//! API server error types

use fabrik_types::CatalogError;
use thiserror::Error;

/// API server errors
#[derive(Debug, Error)]
pub enum ApiServerError {
    /// Non-success response from the store, status passed through untouched
    #[error("API server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed resource: {0}")]
    MalformedResource(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl ApiServerError {
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::remote(404, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::remote(409, message)
    }

    /// Upstream status code, if the store answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type for API server operations
pub type Result<T> = std::result::Result<T, ApiServerError>;
