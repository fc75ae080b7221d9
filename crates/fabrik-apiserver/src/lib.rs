//! Fabrik API server - Declarative store binding and catalog synchronization
//!
//! This crate connects Fabrik to a Kubernetes-style control-plane store:
//!
//! - **ApiServerClient**: create, merge-patch and label-selected listing
//! - **HttpApiServer**: REST binding over `/apis/{group}/{version}`
//! - **InMemoryApiServer**: test double with failure injection and a call journal
//! - **CatalogSynchronizer**: pushes services and plans, registers resource
//!   definitions and reads the catalog back
//!
//! Failures keep the store's status code so callers can tell a conflict
//! from a missing resource from a server error.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod resources;
pub mod sync;

// Re-exports
pub use client::{ApiServerClient, ListOptions};
pub use config::ApiServerConfig;
pub use error::{ApiServerError, Result};
pub use http::HttpApiServer;
pub use memory::{InMemoryApiServer, RecordedCall, Verb};
pub use resources::{
    crd_definition, ResourceKind, CUSTOM_RESOURCE_DEFINITIONS, EVENTS, PLANS, REGISTERED_KINDS,
    SERVICES, SERVICE_BINDINGS, SERVICE_INSTANCES,
};
pub use sync::{plan_resource, service_resource, CatalogSynchronizer};
