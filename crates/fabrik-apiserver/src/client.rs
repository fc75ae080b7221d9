//! Declarative store client trait

use crate::error::Result;
use crate::resources::ResourceKind;
use async_trait::async_trait;
use serde_json::Value;

/// Options for listing resources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// `None` lists across all namespaces
    pub namespace: Option<String>,
    pub label_selector: Option<String>,
}

impl ListOptions {
    pub fn all_namespaces() -> Self {
        Self::default()
    }

    pub fn in_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            label_selector: None,
        }
    }

    pub fn with_label_selector(mut self, selector: impl Into<String>) -> Self {
        self.label_selector = Some(selector.into());
        self
    }
}

/// Access to a Kubernetes-style declarative store
///
/// Failures carry the store's status code unchanged so callers can
/// branch on conflicts and missing resources.
#[async_trait]
pub trait ApiServerClient: Send + Sync {
    /// Create a resource, returning the stored object
    async fn create(&self, kind: &ResourceKind, namespace: Option<&str>, body: &Value)
        -> Result<Value>;

    /// Apply a JSON merge patch to a named resource
    async fn patch(
        &self,
        kind: &ResourceKind,
        namespace: Option<&str>,
        name: &str,
        body: &Value,
    ) -> Result<Value>;

    /// List resources of a kind
    async fn list(&self, kind: &ResourceKind, options: &ListOptions) -> Result<Vec<Value>>;
}
