//! Catalog synchronization with the declarative store
//!
//! Publishes the broker catalog as `SFService` / `SFPlan` resources,
//! registers the resource definitions the broker relies on, and reads the
//! catalog back across namespaces.

use crate::client::{ApiServerClient, ListOptions};
use crate::error::{ApiServerError, Result};
use crate::resources::{
    crd_definition, ResourceKind, CUSTOM_RESOURCE_DEFINITIONS, PLANS, PLAN_ID_LABEL,
    REGISTERED_KINDS, SERVICES, SERVICE_ID_LABEL,
};
use fabrik_types::{Catalog, CatalogEntry, PlanSpec, ServiceSpec};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Keeps the store's catalog resources in line with the local catalog
pub struct CatalogSynchronizer {
    client: Arc<dyn ApiServerClient>,
    catalog: Catalog,
    namespace: String,
}

impl CatalogSynchronizer {
    pub fn new(client: Arc<dyn ApiServerClient>, catalog: Catalog, namespace: impl Into<String>) -> Self {
        Self {
            client,
            catalog,
            namespace: namespace.into(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Publish every service followed by its plans.
    ///
    /// Returns one entry per stored service and plan, in catalog order.
    /// Stops at the first failure that is not a conflict; earlier writes
    /// stay in place.
    pub async fn push_service_plans(&self) -> Result<Vec<CatalogEntry>> {
        self.catalog.validate()?;
        info!(
            namespace = %self.namespace,
            entries = self.catalog.entry_count(),
            "Pushing catalog"
        );

        let mut stored = Vec::with_capacity(self.catalog.entry_count());
        for definition in &self.catalog.services {
            let service = &definition.service;
            let object = self
                .create_or_patch(&SERVICES, &service.id, &service_resource(service)?)
                .await?;
            stored.push(CatalogEntry::Service(spec_of(&object)?));

            for plan in &definition.plans {
                // A plan always belongs to the service it is listed under.
                let mut plan = plan.clone();
                plan.service_id = service.id.clone();
                let object = self
                    .create_or_patch(&PLANS, &plan.id, &plan_resource(&plan)?)
                    .await?;
                stored.push(CatalogEntry::Plan(spec_of(&object)?));
            }
        }

        info!(count = stored.len(), "Catalog pushed");
        Ok(stored)
    }

    /// Register the broker's resource definitions, updating existing ones
    pub async fn register_crds(&self) -> Result<()> {
        for kind in REGISTERED_KINDS.iter() {
            let name = kind.crd_name();
            let definition = crd_definition(kind);
            debug!(crd = %name, "Registering resource definition");

            match self
                .client
                .patch(&CUSTOM_RESOURCE_DEFINITIONS, None, &name, &definition)
                .await
            {
                Ok(_) => {}
                Err(err) if err.is_not_found() => {
                    debug!(crd = %name, "Definition missing, creating");
                    self.client
                        .create(&CUSTOM_RESOURCE_DEFINITIONS, None, &definition)
                        .await?;
                }
                Err(err) => return Err(err),
            }
        }

        info!(count = REGISTERED_KINDS.len(), "Resource definitions registered");
        Ok(())
    }

    /// Every service in the store, across namespaces
    pub async fn get_all_services(&self) -> Result<Vec<ServiceSpec>> {
        let items = self
            .client
            .list(&SERVICES, &ListOptions::all_namespaces())
            .await?;
        items.iter().map(spec_of).collect()
    }

    /// Every plan labelled with `service_id`, across namespaces
    pub async fn get_all_plans_for_service(&self, service_id: &str) -> Result<Vec<PlanSpec>> {
        let options = ListOptions::all_namespaces()
            .with_label_selector(format!("{}={}", SERVICE_ID_LABEL, service_id));
        let items = self.client.list(&PLANS, &options).await?;
        items.iter().map(spec_of).collect()
    }

    async fn create_or_patch(&self, kind: &ResourceKind, name: &str, body: &Value) -> Result<Value> {
        let namespace = Some(self.namespace.as_str());
        debug!(kind = kind.kind, %name, "Creating resource");

        match self.client.create(kind, namespace, body).await {
            Err(err) if err.is_conflict() => {
                warn!(kind = kind.kind, %name, "Resource exists, patching instead");
                self.client.patch(kind, namespace, name, body).await
            }
            other => other,
        }
    }
}

/// `SFService` resource for a catalog service
pub fn service_resource(service: &ServiceSpec) -> Result<Value> {
    Ok(json!({
        "apiVersion": SERVICES.api_version(),
        "kind": SERVICES.kind,
        "metadata": {
            "name": service.id,
            "labels": { SERVICE_ID_LABEL: service.id },
        },
        "spec": serde_json::to_value(service)?,
    }))
}

/// `SFPlan` resource for a catalog plan
pub fn plan_resource(plan: &PlanSpec) -> Result<Value> {
    Ok(json!({
        "apiVersion": PLANS.api_version(),
        "kind": PLANS.kind,
        "metadata": {
            "name": plan.id,
            "labels": {
                SERVICE_ID_LABEL: plan.service_id,
                PLAN_ID_LABEL: plan.id,
            },
        },
        "spec": serde_json::to_value(plan)?,
    }))
}

fn spec_of<T: DeserializeOwned>(object: &Value) -> Result<T> {
    let spec = object.get("spec").ok_or_else(|| {
        let name = object
            .pointer("/metadata/name")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>");
        ApiServerError::MalformedResource(format!("{} has no spec", name))
    })?;
    Ok(serde_json::from_value(spec.clone())?)
}
