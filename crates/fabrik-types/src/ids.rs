//! Deployment and task identities
//!
//! Directors and job schedulers only keep a single opaque name per
//! deployment, so the structured identity below is always flattened into
//! that name. Decoding lives in `fabrik-fleet`, next to the patterns.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix used for every deployment the broker creates
pub const DEFAULT_DEPLOYMENT_PREFIX: &str = "service-fabrik";

/// Structured identity of a deployment
///
/// Encodes as `<prefix>[_<subnet>]-<network_index>-<instance_guid>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeploymentName {
    /// Service prefix
    pub prefix: String,

    /// Optional subnet, never empty
    pub subnet: Option<String>,

    /// Network segment index
    pub network_index: u32,

    /// Service instance id
    pub instance_guid: Uuid,
}

impl DeploymentName {
    /// Create a deployment name with the default prefix and no subnet
    pub fn new(network_index: u32, instance_guid: Uuid) -> Self {
        Self {
            prefix: DEFAULT_DEPLOYMENT_PREFIX.to_string(),
            subnet: None,
            network_index,
            instance_guid,
        }
    }

    /// Replace the prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the subnet; an empty subnet means no subnet
    pub fn with_subnet(mut self, subnet: Option<impl Into<String>>) -> Self {
        self.subnet = subnet.map(Into::into).filter(|s: &String| !s.is_empty());
        self
    }

    /// The leading `prefix[_subnet]` segment
    pub fn qualified_prefix(&self) -> String {
        match &self.subnet {
            Some(subnet) => format!("{}_{}", self.prefix, subnet),
            None => self.prefix.clone(),
        }
    }
}

impl fmt::Display for DeploymentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.qualified_prefix(),
            self.network_index,
            self.instance_guid.hyphenated()
        )
    }
}

/// Director task bound to a deployment
///
/// Encodes as `<deployment_name>_<task_id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskIdentity {
    /// Encoded deployment name
    pub deployment_name: String,

    /// Director task id
    pub task_id: u64,
}

impl TaskIdentity {
    pub fn new(deployment_name: impl Into<String>, task_id: u64) -> Self {
        Self {
            deployment_name: deployment_name.into(),
            task_id,
        }
    }
}

impl fmt::Display for TaskIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.deployment_name, self.task_id)
    }
}
