//! CLI error types

use fabrik_apiserver::ApiServerError;
use fabrik_fleet::FleetError;
use fabrik_types::CatalogError;
use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Declarative store error
    #[error("API server error: {0}")]
    ApiServer(#[from] ApiServerError),

    /// Fleet operation error
    #[error("{0}")]
    Fleet(#[from] FleetError),

    /// Catalog loading error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
