//! Fleet operation error types

use thiserror::Error;

/// Fleet operation errors
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Broker agent credentials not found in manifest {manifest}: {reason}")]
    CredentialsNotFound { manifest: String, reason: String },

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Invalid {platform} context: {reason}")]
    InvalidContext { platform: String, reason: String },

    #[error("Invalid deployment name: {0}")]
    InvalidDeploymentName(String),

    #[error("Invalid task id: {0}")]
    InvalidTaskId(String),

    #[error("Malformed manifest: {0}")]
    ManifestParse(#[from] serde_yaml::Error),
}

impl FleetError {
    pub(crate) fn invalid_schedule(reason: impl Into<String>) -> Self {
        Self::InvalidSchedule(reason.into())
    }

    pub(crate) fn invalid_context(platform: &str, reason: impl Into<String>) -> Self {
        Self::InvalidContext {
            platform: platform.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for fleet operations
pub type Result<T> = std::result::Result<T, FleetError>;
