//! Fabrik Types - Core types for fleet operations
//!
//! Fabrik keeps thousands of independently deployed service instances
//! identifiable, schedulable and in sync with a declarative control-plane
//! store. This crate holds the shared vocabulary.
//!
//! ## Key Concepts
//!
//! - **DeploymentName**: structured identity flattened into a director name
//! - **TaskIdentity**: a director task bound to a deployment
//! - **PlatformContext**: where a broker request came from
//! - **Catalog**: services and plans the broker advertises
//! - **AgentCredentials**: broker-agent login found in deployment manifests

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod catalog;
pub mod credentials;
pub mod ids;
pub mod platform;

// Re-export main types
pub use catalog::{Catalog, CatalogEntry, CatalogError, PlanSpec, ServiceDefinition, ServiceSpec};
pub use credentials::AgentCredentials;
pub use ids::{DeploymentName, TaskIdentity, DEFAULT_DEPLOYMENT_PREFIX};
pub use platform::{PlatformContext, PlatformKind, DELEGATING_PLATFORM};
