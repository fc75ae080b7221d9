//! Deployment and task name codec
//!
//! Deployment names look like `<prefix>[_<subnet>]-<index>-<guid>` and task
//! ids append `_<task>` to a deployment name. The patterns below expose the
//! pieces as capture groups:
//!
//! - deployment name: (1) `prefix[_subnet]`, (2) index, (3) instance guid
//! - task id: (1) deployment name, (2) numeric task id

use crate::error::{FleetError, Result};
use fabrik_types::{DeploymentName, TaskIdentity, DEFAULT_DEPLOYMENT_PREFIX};
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

const GUID_PATTERN: &str =
    "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";

/// Encode a deployment name from its parts
pub fn encode_deployment_name(
    prefix: &str,
    subnet: Option<&str>,
    network_index: u32,
    instance_guid: &Uuid,
) -> String {
    DeploymentName::new(network_index, *instance_guid)
        .with_prefix(prefix)
        .with_subnet(subnet)
        .to_string()
}

/// Deployment name pattern for the default prefix
pub fn deployment_name_regex(subnet: Option<&str>) -> Regex {
    deployment_name_regex_for(DEFAULT_DEPLOYMENT_PREFIX, subnet)
}

/// Deployment name pattern for an explicit prefix
pub fn deployment_name_regex_for(prefix: &str, subnet: Option<&str>) -> Regex {
    let head = match subnet.filter(|s| !s.is_empty()) {
        Some(subnet) => format!("{}_{}", regex::escape(prefix), regex::escape(subnet)),
        None => regex::escape(prefix),
    };
    Regex::new(&format!("^({})-([0-9]+)-({})$", head, GUID_PATTERN))
        .expect("escaped deployment name pattern is valid")
}

/// Task id pattern; only the last `_<digits>` segment is the task id
pub fn task_id_regex() -> &'static Regex {
    static TASK_ID: OnceLock<Regex> = OnceLock::new();
    TASK_ID.get_or_init(|| {
        Regex::new(r"^([\w.-]+)_([0-9]+)$").expect("task id pattern is valid")
    })
}

/// Decode a deployment name with the default prefix
pub fn decode_deployment_name(name: &str, subnet: Option<&str>) -> Result<DeploymentName> {
    DeploymentNameCodec::new(DEFAULT_DEPLOYMENT_PREFIX, subnet).decode(name)
}

/// Encode a task id
pub fn encode_task_id(deployment_name: &str, task_id: u64) -> String {
    TaskIdentity::new(deployment_name, task_id).to_string()
}

/// Split a task id into deployment name and task number
pub fn decode_task_id(value: &str) -> Result<TaskIdentity> {
    let caps = task_id_regex()
        .captures(value)
        .ok_or_else(|| FleetError::InvalidTaskId(value.to_string()))?;
    let task_id = caps[2]
        .parse()
        .map_err(|_| FleetError::InvalidTaskId(value.to_string()))?;
    Ok(TaskIdentity::new(&caps[1], task_id))
}

/// Codec bound to one prefix and subnet
///
/// Compiles the deployment name pattern once; use it when decoding many
/// names from the same director.
#[derive(Debug, Clone)]
pub struct DeploymentNameCodec {
    prefix: String,
    subnet: Option<String>,
    pattern: Regex,
}

impl DeploymentNameCodec {
    pub fn new(prefix: impl Into<String>, subnet: Option<&str>) -> Self {
        let prefix = prefix.into();
        let subnet = subnet.filter(|s| !s.is_empty()).map(str::to_string);
        let pattern = deployment_name_regex_for(&prefix, subnet.as_deref());
        Self {
            prefix,
            subnet,
            pattern,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn subnet(&self) -> Option<&str> {
        self.subnet.as_deref()
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn encode(&self, network_index: u32, instance_guid: &Uuid) -> String {
        encode_deployment_name(
            &self.prefix,
            self.subnet.as_deref(),
            network_index,
            instance_guid,
        )
    }

    pub fn decode(&self, name: &str) -> Result<DeploymentName> {
        let invalid = || FleetError::InvalidDeploymentName(name.to_string());
        let caps = self.pattern.captures(name).ok_or_else(invalid)?;
        let network_index = caps[2].parse().map_err(|_| invalid())?;
        let instance_guid = Uuid::parse_str(&caps[3]).map_err(|_| invalid())?;

        Ok(DeploymentName {
            prefix: self.prefix.clone(),
            subnet: self.subnet.clone(),
            network_index,
            instance_guid,
        })
    }

    /// Does the name belong to this prefix and subnet?
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }
}

impl Default for DeploymentNameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_DEPLOYMENT_PREFIX, None)
    }
}
