//! Resource groups, resource kinds and their definitions

use serde_json::{json, Value};

/// Resource group holding the broker's catalog and instance resources
pub const INTEROPERATOR_GROUP: &str = "osb.servicefabrik.io";

/// Resource group holding per-instance events
pub const INSTANCE_GROUP: &str = "instance.servicefabrik.io";

/// Resource group of custom resource definitions
pub const CRD_GROUP: &str = "apiextensions.k8s.io";

/// Label linking catalog resources to their service
pub const SERVICE_ID_LABEL: &str = "serviceId";

/// Label carrying a plan id
pub const PLAN_ID_LABEL: &str = "planId";

const CUSTOM_VERSION: &str = "v1alpha1";

/// A typed collection in the declarative store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceKind {
    pub group: &'static str,
    pub version: &'static str,
    pub kind: &'static str,
    pub plural: &'static str,
    pub singular: &'static str,
    pub namespaced: bool,
}

impl ResourceKind {
    /// `group/version`
    pub fn api_version(&self) -> String {
        format!("{}/{}", self.group, self.version)
    }

    /// Name of the definition registering this kind
    pub fn crd_name(&self) -> String {
        format!("{}.{}", self.plural, self.group)
    }
}

const fn custom(
    group: &'static str,
    kind: &'static str,
    plural: &'static str,
    singular: &'static str,
) -> ResourceKind {
    ResourceKind {
        group,
        version: CUSTOM_VERSION,
        kind,
        plural,
        singular,
        namespaced: true,
    }
}

pub const SERVICES: ResourceKind = custom(INTEROPERATOR_GROUP, "SFService", "sfservices", "sfservice");
pub const PLANS: ResourceKind = custom(INTEROPERATOR_GROUP, "SFPlan", "sfplans", "sfplan");
pub const SERVICE_INSTANCES: ResourceKind = custom(
    INTEROPERATOR_GROUP,
    "SFServiceInstance",
    "sfserviceinstances",
    "sfserviceinstance",
);
pub const SERVICE_BINDINGS: ResourceKind = custom(
    INTEROPERATOR_GROUP,
    "SFServiceBinding",
    "sfservicebindings",
    "sfservicebinding",
);
pub const EVENTS: ResourceKind = custom(INSTANCE_GROUP, "SFEvent", "sfevents", "sfevent");

pub const CUSTOM_RESOURCE_DEFINITIONS: ResourceKind = ResourceKind {
    group: CRD_GROUP,
    version: "v1",
    kind: "CustomResourceDefinition",
    plural: "customresourcedefinitions",
    singular: "customresourcedefinition",
    namespaced: false,
};

/// Definitions registered by the broker, in registration order
pub const REGISTERED_KINDS: [ResourceKind; 5] =
    [PLANS, SERVICES, SERVICE_INSTANCES, SERVICE_BINDINGS, EVENTS];

/// Custom resource definition body for a kind
pub fn crd_definition(kind: &ResourceKind) -> Value {
    json!({
        "apiVersion": CUSTOM_RESOURCE_DEFINITIONS.api_version(),
        "kind": CUSTOM_RESOURCE_DEFINITIONS.kind,
        "metadata": {
            "name": kind.crd_name(),
        },
        "spec": {
            "group": kind.group,
            "names": {
                "kind": kind.kind,
                "listKind": format!("{}List", kind.kind),
                "plural": kind.plural,
                "singular": kind.singular,
            },
            "scope": if kind.namespaced { "Namespaced" } else { "Cluster" },
            "versions": [{
                "name": kind.version,
                "served": true,
                "storage": true,
                "subresources": { "status": {} },
                "schema": {
                    "openAPIV3Schema": {
                        "type": "object",
                        "x-kubernetes-preserve-unknown-fields": true,
                    }
                }
            }]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crd_names() {
        assert_eq!(PLANS.crd_name(), "sfplans.osb.servicefabrik.io");
        assert_eq!(EVENTS.crd_name(), "sfevents.instance.servicefabrik.io");
        assert_eq!(SERVICES.api_version(), "osb.servicefabrik.io/v1alpha1");
    }

    #[test]
    fn test_crd_definition_shape() {
        let crd = crd_definition(&SERVICE_BINDINGS);
        assert_eq!(crd["apiVersion"], "apiextensions.k8s.io/v1");
        assert_eq!(crd["metadata"]["name"], "sfservicebindings.osb.servicefabrik.io");
        assert_eq!(crd["spec"]["names"]["kind"], "SFServiceBinding");
        assert_eq!(crd["spec"]["names"]["listKind"], "SFServiceBindingList");
        assert_eq!(crd["spec"]["scope"], "Namespaced");
        assert_eq!(crd["spec"]["versions"][0]["name"], "v1alpha1");
    }

    #[test]
    fn test_registered_kinds_are_distinct() {
        let names: std::collections::HashSet<_> =
            REGISTERED_KINDS.iter().map(|k| k.crd_name()).collect();
        assert_eq!(names.len(), REGISTERED_KINDS.len());
    }
}
