//! Broker-agent credential lookup in deployment manifests
//!
//! Manifests from different releases nest the agent job in different
//! instance groups and positions, so the lookup walks the loosely typed
//! tree instead of binding to a schema.

use crate::error::{FleetError, Result};
use fabrik_types::AgentCredentials;
use serde_json::Value;

/// Substring identifying the broker-agent job
pub const BROKER_AGENT_JOB: &str = "broker-agent";

/// Parse manifest text (YAML or JSON) into a tree
pub fn parse_manifest(contents: &str) -> Result<Value> {
    Ok(serde_yaml::from_str(contents)?)
}

/// Credentials of the first broker-agent job, in group order then job order
pub fn broker_agent_creds_from_manifest(manifest: &Value) -> Result<AgentCredentials> {
    let manifest_name = manifest
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>");
    let not_found = |reason: &str| FleetError::CredentialsNotFound {
        manifest: manifest_name.to_string(),
        reason: reason.to_string(),
    };

    let job = jobs(manifest)
        .find(|job| {
            job.get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| name.contains(BROKER_AGENT_JOB))
        })
        .ok_or_else(|| not_found("no broker-agent job"))?;

    let properties = job.get("properties");
    let field = |key: &str| {
        properties
            .and_then(|p| p.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let username = field("username").ok_or_else(|| not_found("broker-agent job has no username"))?;
    let password = field("password").ok_or_else(|| not_found("broker-agent job has no password"))?;
    Ok(AgentCredentials::new(username, password))
}

fn jobs<'a>(manifest: &'a Value) -> impl Iterator<Item = &'a Value> + 'a {
    manifest
        .get("instance_groups")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|group| group.get("jobs").and_then(Value::as_array))
        .flatten()
}
