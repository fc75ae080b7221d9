//! Platform contexts carried by broker requests
//!
//! Requests can come straight from Cloud Foundry or Kubernetes, or through
//! a service manager (`sapcp`) that wraps one of them and names it in
//! `origin`.

use serde::{Deserialize, Serialize};

/// Platform value meaning "look at `origin` instead"
pub const DELEGATING_PLATFORM: &str = "sapcp";

/// Concrete platform families the broker supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// Cloud Foundry (`cloudfoundry`, `cf`)
    CloudFoundry,

    /// Kubernetes (`kubernetes`, `k8s`)
    Kubernetes,
}

impl PlatformKind {
    /// Map a platform id or its abbreviation to a kind
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "cloudfoundry" | "cf" => Some(PlatformKind::CloudFoundry),
            "kubernetes" | "k8s" => Some(PlatformKind::Kubernetes),
            _ => None,
        }
    }

    /// Canonical (long) platform id
    pub fn canonical_id(&self) -> &'static str {
        match self {
            PlatformKind::CloudFoundry => "cloudfoundry",
            PlatformKind::Kubernetes => "kubernetes",
        }
    }
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical_id())
    }
}

/// Context object attached to provisioning requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformContext {
    /// Platform id as sent by the caller
    pub platform: String,

    /// Originating platform when `platform` is the delegating value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Cloud Foundry organization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_guid: Option<String>,

    /// Cloud Foundry space
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_guid: Option<String>,

    /// Kubernetes namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl PlatformContext {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            ..Default::default()
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_org_and_space(
        mut self,
        organization_guid: impl Into<String>,
        space_guid: impl Into<String>,
    ) -> Self {
        self.organization_guid = Some(organization_guid.into());
        self.space_guid = Some(space_guid.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Is this context routed through the delegating platform?
    pub fn is_delegating(&self) -> bool {
        self.platform == DELEGATING_PLATFORM
    }
}
