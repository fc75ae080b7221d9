//! Configuration for fabrikctl

use fabrik_apiserver::ApiServerConfig;
use fabrik_types::DEFAULT_DEPLOYMENT_PREFIX;
use serde::{Deserialize, Serialize};

/// Main CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FabrikConfig {
    /// Declarative store connection
    #[serde(default)]
    pub apiserver: ApiServerConfig,

    /// Local catalog
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Deployment naming
    #[serde(default)]
    pub deployment: DeploymentConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Local catalog location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to a YAML or JSON catalog
    #[serde(default)]
    pub path: Option<String>,
}

/// Deployment naming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default)]
    pub subnet: Option<String>,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            subnet: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_prefix() -> String {
    DEFAULT_DEPLOYMENT_PREFIX.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl FabrikConfig {
    /// Load configuration from defaults, an optional file and `FABRIK_*`
    /// environment variables, in that order.
    ///
    /// Nested keys use a double underscore, e.g. `FABRIK_APISERVER__URL`.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&FabrikConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("FABRIK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = FabrikConfig::default();
        assert_eq!(config.apiserver.url, "http://127.0.0.1:8001");
        assert_eq!(config.deployment.prefix, "service-fabrik");
        assert!(config.deployment.subnet.is_none());
        assert!(config.catalog.path.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = FabrikConfig::load(None).unwrap();
        assert_eq!(config.apiserver.request_timeout_secs, 30);
        assert_eq!(config.deployment.prefix, "service-fabrik");
    }

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "apiserver:\n  url: https://apiserver.local\n  namespace: fabrik\ndeployment:\n  subnet: sn1\nlogging:\n  json: true"
        )
        .unwrap();

        let config = FabrikConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.apiserver.url, "https://apiserver.local");
        assert_eq!(config.apiserver.namespace, "fabrik");
        assert_eq!(config.apiserver.request_timeout_secs, 30);
        assert_eq!(config.deployment.subnet.as_deref(), Some("sn1"));
        assert_eq!(config.deployment.prefix, "service-fabrik");
        assert!(config.logging.json);
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let config = FabrikConfig::load(Some("/nonexistent/fabrik")).unwrap();
        assert_eq!(config.logging.level, "info");
    }
}
