//! Service and plan catalog
//!
//! The local catalog is a YAML (or JSON) document listing services, each
//! with its plans. The same `ServiceSpec`/`PlanSpec` shapes are stored as
//! the `spec` of the remote custom resources.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// A service the broker advertises
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub bindable: bool,

    #[serde(default)]
    pub plan_updatable: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Free-form broker metadata (display name, image url, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_client: Option<Value>,
}

impl ServiceSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            bindable: false,
            plan_updatable: false,
            tags: Vec::new(),
            metadata: None,
            dashboard_client: None,
        }
    }
}

/// A plan of a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSpec {
    pub id: String,

    pub name: String,

    /// Owning service; filled in from the enclosing service when loading
    #[serde(default)]
    pub service_id: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_true")]
    pub free: bool,

    #[serde(default)]
    pub bindable: bool,

    #[serde(default)]
    pub plan_updatable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,

    /// Lifecycle manager settings (director, docker, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<Value>,
}

impl PlanSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            service_id: String::new(),
            description: String::new(),
            free: true,
            bindable: false,
            plan_updatable: false,
            metadata: None,
            manager: None,
            templates: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Service entry of the local catalog, with its plans inline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    #[serde(flatten)]
    pub service: ServiceSpec,

    #[serde(default)]
    pub plans: Vec<PlanSpec>,
}

/// Local catalog definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub services: Vec<ServiceDefinition>,
}

impl Catalog {
    /// Parse a catalog from YAML or JSON text
    pub fn from_yaml_str(contents: &str) -> Result<Self, CatalogError> {
        let mut catalog: Catalog = serde_yaml::from_str(contents)?;
        catalog.link_plans();
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Point every plan at its enclosing service
    pub fn link_plans(&mut self) {
        for definition in &mut self.services {
            for plan in &mut definition.plans {
                plan.service_id = definition.service.id.clone();
            }
        }
    }

    /// Reject duplicate or empty ids
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut service_ids = HashSet::new();
        let mut plan_ids = HashSet::new();

        for definition in &self.services {
            let service = &definition.service;
            if service.id.is_empty() {
                return Err(CatalogError::EmptyId(format!("service {}", service.name)));
            }
            if !service_ids.insert(service.id.as_str()) {
                return Err(CatalogError::DuplicateService(service.id.clone()));
            }

            for plan in &definition.plans {
                if plan.id.is_empty() {
                    return Err(CatalogError::EmptyId(format!("plan {}", plan.name)));
                }
                if !plan_ids.insert(plan.id.as_str()) {
                    return Err(CatalogError::DuplicatePlan(plan.id.clone()));
                }
            }
        }

        Ok(())
    }

    /// Number of services plus plans
    pub fn entry_count(&self) -> usize {
        self.services.iter().map(|d| 1 + d.plans.len()).sum()
    }
}

/// A catalog record as stored remotely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogEntry {
    Service(ServiceSpec),
    Plan(PlanSpec),
}

impl CatalogEntry {
    pub fn id(&self) -> &str {
        match self {
            CatalogEntry::Service(s) => &s.id,
            CatalogEntry::Plan(p) => &p.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CatalogEntry::Service(s) => &s.name,
            CatalogEntry::Plan(p) => &p.name,
        }
    }
}

/// Catalog loading and validation errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Cannot read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Duplicate service id: {0}")]
    DuplicateService(String),

    #[error("Duplicate plan id: {0}")]
    DuplicatePlan(String),

    #[error("Missing id for {0}")]
    EmptyId(String),
}
