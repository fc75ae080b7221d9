//! Connection settings for the declarative store

use serde::{Deserialize, Serialize};

/// Declarative store connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiServerConfig {
    /// Base URL of the API server
    #[serde(default = "default_url")]
    pub url: String,

    /// Bearer token, if the server requires one
    #[serde(default)]
    pub token: Option<String>,

    /// Namespace catalog resources are written to
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: None,
            namespace: default_namespace(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_url() -> String {
    "http://127.0.0.1:8001".to_string()
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
