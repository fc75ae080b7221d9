//! Platform resolution and platform managers
//!
//! A request's platform decides which tenant resource owns the instance and
//! how quota is counted. Service-manager requests (`sapcp`) only wrap a
//! concrete platform, named in `origin`.

use crate::error::{FleetError, Result};
use fabrik_types::{PlatformContext, PlatformKind, DELEGATING_PLATFORM};

/// Platform governing a request context
///
/// Never fails: unknown platforms come back verbatim for the caller to
/// reject.
pub fn platform_from_context(context: &PlatformContext) -> &str {
    if context.is_delegating() {
        if let Some(origin) = context.origin.as_deref() {
            return origin;
        }
    }
    &context.platform
}

/// Build the platform manager for a request context
pub fn platform_manager(context: &PlatformContext) -> Result<PlatformManager> {
    if context.is_delegating() {
        let origin = context.origin.as_deref().ok_or_else(|| {
            FleetError::invalid_context(DELEGATING_PLATFORM, "origin is required")
        })?;
        let inner = PlatformManager::for_platform(origin)?;
        return Ok(PlatformManager::Delegating {
            inner: Box::new(inner),
        });
    }
    PlatformManager::for_platform(&context.platform)
}

/// Tenant-facing behavior of one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformManager {
    /// Cloud Foundry; tenants are org/space pairs
    CloudFoundry { platform: String },

    /// Kubernetes; tenants are namespaces
    Kubernetes { platform: String },

    /// Service-manager request wrapping a concrete platform
    Delegating { inner: Box<PlatformManager> },
}

impl PlatformManager {
    /// Manager for a concrete platform id, keeping the caller's spelling
    pub fn for_platform(platform: &str) -> Result<Self> {
        match PlatformKind::from_id(platform) {
            Some(PlatformKind::CloudFoundry) => Ok(PlatformManager::CloudFoundry {
                platform: platform.to_string(),
            }),
            Some(PlatformKind::Kubernetes) => Ok(PlatformManager::Kubernetes {
                platform: platform.to_string(),
            }),
            None => Err(FleetError::UnsupportedPlatform(platform.to_string())),
        }
    }

    /// Resolved platform id
    pub fn platform(&self) -> &str {
        match self {
            PlatformManager::CloudFoundry { platform } | PlatformManager::Kubernetes { platform } => {
                platform.as_str()
            }
            PlatformManager::Delegating { inner } => inner.platform(),
        }
    }

    pub fn kind(&self) -> PlatformKind {
        match self {
            PlatformManager::CloudFoundry { .. } => PlatformKind::CloudFoundry,
            PlatformManager::Kubernetes { .. } => PlatformKind::Kubernetes,
            PlatformManager::Delegating { inner } => inner.kind(),
        }
    }

    /// Tenant resource owning service instances
    pub fn resource_type(&self) -> &'static str {
        match self.kind() {
            PlatformKind::CloudFoundry => "space",
            PlatformKind::Kubernetes => "namespace",
        }
    }

    /// Check that the context carries the tenant fields this platform needs
    pub fn validate_context(&self, context: &PlatformContext) -> Result<()> {
        match self {
            PlatformManager::CloudFoundry { platform } => {
                if context.organization_guid.as_deref().map_or(true, str::is_empty) {
                    return Err(FleetError::invalid_context(platform, "organization_guid is required"));
                }
                if context.space_guid.as_deref().map_or(true, str::is_empty) {
                    return Err(FleetError::invalid_context(platform, "space_guid is required"));
                }
                Ok(())
            }
            PlatformManager::Kubernetes { platform } => {
                if context.namespace.as_deref().map_or(true, str::is_empty) {
                    return Err(FleetError::invalid_context(platform, "namespace is required"));
                }
                Ok(())
            }
            PlatformManager::Delegating { inner } => inner.validate_context(context),
        }
    }

    /// Key quota is counted against
    pub fn quota_key(&self, context: &PlatformContext) -> Result<String> {
        self.validate_context(context)?;
        let key = match self.kind() {
            PlatformKind::CloudFoundry => context.organization_guid.clone(),
            PlatformKind::Kubernetes => context.namespace.clone(),
        };
        key.ok_or_else(|| FleetError::invalid_context(self.platform(), "missing quota key"))
    }

    pub fn is_delegating(&self) -> bool {
        matches!(self, PlatformManager::Delegating { .. })
    }
}
