//! In-memory declarative store
//!
//! Suitable for development and testing. Supports failure injection per
//! verb and kind, and records every call in a journal so tests can assert
//! on ordering.

use crate::client::{ApiServerClient, ListOptions};
use crate::error::{ApiServerError, Result};
use crate::resources::ResourceKind;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

const DEFAULT_NAMESPACE: &str = "default";

/// Store operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Create,
    Patch,
    List,
}

/// A call observed by the in-memory store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub verb: Verb,
    pub plural: &'static str,
    pub namespace: Option<String>,
    pub name: Option<String>,
    pub label_selector: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct ObjectKey {
    resource: String,
    namespace: Option<String>,
    name: String,
}

/// In-memory implementation of [`ApiServerClient`]
pub struct InMemoryApiServer {
    objects: DashMap<ObjectKey, Value>,
    failures: DashMap<(Verb, &'static str), u16>,
    journal: RwLock<Vec<RecordedCall>>,
    resource_version: AtomicU64,
}

impl InMemoryApiServer {
    pub fn new() -> Self {
        Self {
            objects: DashMap::new(),
            failures: DashMap::new(),
            journal: RwLock::new(Vec::new()),
            resource_version: AtomicU64::new(0),
        }
    }

    /// Fail every `verb` on `kind` with `status` until cleared
    pub fn fail_with(&self, verb: Verb, kind: &ResourceKind, status: u16) {
        self.failures.insert((verb, kind.plural), status);
    }

    pub fn clear_failures(&self) {
        self.failures.clear();
    }

    /// Calls received so far, in arrival order
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.journal.read().await.clone()
    }

    /// Stored object, if present
    pub fn get(&self, kind: &ResourceKind, namespace: Option<&str>, name: &str) -> Option<Value> {
        self.objects
            .get(&Self::key(kind, namespace, name))
            .map(|obj| obj.clone())
    }

    /// Number of stored objects of a kind, across namespaces
    pub fn count(&self, kind: &ResourceKind) -> usize {
        let resource = kind.crd_name();
        self.objects
            .iter()
            .filter(|entry| entry.key().resource == resource)
            .count()
    }

    fn key(kind: &ResourceKind, namespace: Option<&str>, name: &str) -> ObjectKey {
        ObjectKey {
            resource: kind.crd_name(),
            namespace: Self::scope(kind, namespace),
            name: name.to_string(),
        }
    }

    fn scope(kind: &ResourceKind, namespace: Option<&str>) -> Option<String> {
        if kind.namespaced {
            Some(namespace.unwrap_or(DEFAULT_NAMESPACE).to_string())
        } else {
            None
        }
    }

    async fn record(&self, call: RecordedCall) {
        self.journal.write().await.push(call);
    }

    fn injected(&self, verb: Verb, kind: &ResourceKind) -> Result<()> {
        match self.failures.get(&(verb, kind.plural)) {
            Some(status) => Err(ApiServerError::remote(
                *status,
                format!("injected failure for {:?} {}", verb, kind.plural),
            )),
            None => Ok(()),
        }
    }

    fn next_version(&self) -> String {
        (self.resource_version.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }
}

impl Default for InMemoryApiServer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApiServerClient for InMemoryApiServer {
    async fn create(
        &self,
        kind: &ResourceKind,
        namespace: Option<&str>,
        body: &Value,
    ) -> Result<Value> {
        let name = body
            .pointer("/metadata/name")
            .and_then(Value::as_str)
            .map(str::to_string);

        self.record(RecordedCall {
            verb: Verb::Create,
            plural: kind.plural,
            namespace: namespace.map(str::to_string),
            name: name.clone(),
            label_selector: None,
        })
        .await;
        self.injected(Verb::Create, kind)?;

        let name = name.ok_or_else(|| {
            ApiServerError::remote(422, format!("{} is missing metadata.name", kind.kind))
        })?;
        let key = Self::key(kind, namespace, &name);
        let mut object = body.clone();
        let metadata = metadata_mut(&mut object)?;
        if let Some(ns) = &key.namespace {
            metadata.insert("namespace".into(), Value::String(ns.clone()));
        }
        metadata.insert(
            "creationTimestamp".into(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        );

        // The existence check and the insert happen under one shard lock.
        match self.objects.entry(key) {
            Entry::Occupied(_) => Err(ApiServerError::conflict(format!(
                "{} \"{}\" already exists",
                kind.crd_name(),
                name
            ))),
            Entry::Vacant(slot) => {
                metadata_mut(&mut object)?.insert(
                    "resourceVersion".into(),
                    Value::String(self.next_version()),
                );
                slot.insert(object.clone());
                Ok(object)
            }
        }
    }

    async fn patch(
        &self,
        kind: &ResourceKind,
        namespace: Option<&str>,
        name: &str,
        body: &Value,
    ) -> Result<Value> {
        self.record(RecordedCall {
            verb: Verb::Patch,
            plural: kind.plural,
            namespace: namespace.map(str::to_string),
            name: Some(name.to_string()),
            label_selector: None,
        })
        .await;
        self.injected(Verb::Patch, kind)?;

        let key = Self::key(kind, namespace, name);
        let mut entry = self.objects.get_mut(&key).ok_or_else(|| {
            ApiServerError::not_found(format!("{} \"{}\" not found", kind.crd_name(), name))
        })?;

        merge_patch(entry.value_mut(), body);
        let metadata = metadata_mut(entry.value_mut())?;
        metadata.insert("name".into(), Value::String(name.to_string()));
        if let Some(ns) = &key.namespace {
            metadata.insert("namespace".into(), Value::String(ns.clone()));
        }
        metadata.insert(
            "resourceVersion".into(),
            Value::String(self.next_version()),
        );

        Ok(entry.value().clone())
    }

    async fn list(&self, kind: &ResourceKind, options: &ListOptions) -> Result<Vec<Value>> {
        self.record(RecordedCall {
            verb: Verb::List,
            plural: kind.plural,
            namespace: options.namespace.clone(),
            name: None,
            label_selector: options.label_selector.clone(),
        })
        .await;
        self.injected(Verb::List, kind)?;

        let selector = options
            .label_selector
            .as_deref()
            .map(LabelSelector::parse)
            .transpose()?;
        let resource = kind.crd_name();

        let mut matched: Vec<(ObjectKey, Value)> = self
            .objects
            .iter()
            .filter(|entry| entry.key().resource == resource)
            .filter(|entry| match &options.namespace {
                Some(ns) if kind.namespaced => entry.key().namespace.as_deref() == Some(ns.as_str()),
                _ => true,
            })
            .filter(|entry| {
                selector
                    .as_ref()
                    .map_or(true, |s| s.matches(entry.value()))
            })
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        matched.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(matched.into_iter().map(|(_, obj)| obj).collect())
    }
}

fn metadata_mut(object: &mut Value) -> Result<&mut Map<String, Value>> {
    let root = object
        .as_object_mut()
        .ok_or_else(|| ApiServerError::MalformedResource("resource is not an object".into()))?;
    root.entry("metadata")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| ApiServerError::MalformedResource("metadata is not an object".into()))
}

/// JSON merge patch: objects merge recursively, `null` deletes, anything
/// else replaces.
pub(crate) fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(target_map) = target {
        for (key, value) in patch_map {
            if value.is_null() {
                target_map.remove(key);
            } else {
                merge_patch(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Requirement {
    Equals(String, String),
    NotEquals(String, String),
    Exists(String),
}

/// Equality-based label selector
#[derive(Debug, PartialEq, Eq)]
struct LabelSelector(Vec<Requirement>);

impl LabelSelector {
    fn parse(raw: &str) -> Result<Self> {
        let mut requirements = Vec::new();
        for term in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let requirement = if let Some((k, v)) = term.split_once("!=") {
                Requirement::NotEquals(k.trim().into(), v.trim().into())
            } else if let Some((k, v)) = term.split_once("==") {
                Requirement::Equals(k.trim().into(), v.trim().into())
            } else if let Some((k, v)) = term.split_once('=') {
                Requirement::Equals(k.trim().into(), v.trim().into())
            } else {
                Requirement::Exists(term.into())
            };
            let key = match &requirement {
                Requirement::Equals(k, _) | Requirement::NotEquals(k, _) | Requirement::Exists(k) => k,
            };
            if key.is_empty() {
                return Err(ApiServerError::remote(
                    400,
                    format!("invalid label selector: {}", raw),
                ));
            }
            requirements.push(requirement);
        }
        Ok(Self(requirements))
    }

    fn matches(&self, object: &Value) -> bool {
        let labels = object.pointer("/metadata/labels");
        let label = |key: &str| labels.and_then(|l| l.get(key)).and_then(Value::as_str);
        self.0.iter().all(|req| match req {
            Requirement::Equals(k, v) => label(k) == Some(v.as_str()),
            Requirement::NotEquals(k, v) => label(k) != Some(v.as_str()),
            Requirement::Exists(k) => label(k).is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{CUSTOM_RESOURCE_DEFINITIONS, PLANS, SERVICES};
    use serde_json::json;
    use std::sync::Arc;

    fn plan(name: &str, service_id: &str) -> Value {
        json!({
            "metadata": { "name": name, "labels": { "serviceId": service_id } },
            "spec": { "id": name }
        })
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_admit_one() {
        let store = Arc::new(InMemoryApiServer::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create(&SERVICES, Some("fabrik"), &json!({ "metadata": { "name": "svc" } }))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(err) => assert!(err.is_conflict(), "{}", err),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.count(&SERVICES), 1);
        let stored = store.get(&SERVICES, Some("fabrik"), "svc").unwrap();
        assert_eq!(stored["metadata"]["resourceVersion"], "1");
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryApiServer::new();
        let created = store
            .create(&SERVICES, Some("fabrik"), &json!({ "metadata": { "name": "svc" } }))
            .await
            .unwrap();

        assert_eq!(created["metadata"]["namespace"], "fabrik");
        assert_eq!(created["metadata"]["resourceVersion"], "1");
        assert!(store.get(&SERVICES, Some("fabrik"), "svc").is_some());
        assert!(store.get(&SERVICES, Some("other"), "svc").is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_conflicts() {
        let store = InMemoryApiServer::new();
        let body = json!({ "metadata": { "name": "svc" } });
        store.create(&SERVICES, None, &body).await.unwrap();

        let err = store.create(&SERVICES, None, &body).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_create_without_name_is_rejected() {
        let store = InMemoryApiServer::new();
        let err = store
            .create(&SERVICES, None, &json!({ "spec": {} }))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(422));
    }

    #[tokio::test]
    async fn test_cluster_scoped_ignores_namespace() {
        let store = InMemoryApiServer::new();
        let body = json!({ "metadata": { "name": "sfplans.osb.servicefabrik.io" } });
        let created = store
            .create(&CUSTOM_RESOURCE_DEFINITIONS, Some("ignored"), &body)
            .await
            .unwrap();

        assert!(created["metadata"].get("namespace").is_none());
        assert!(store
            .get(&CUSTOM_RESOURCE_DEFINITIONS, None, "sfplans.osb.servicefabrik.io")
            .is_some());
    }

    #[tokio::test]
    async fn test_patch_merges_and_missing_is_not_found() {
        let store = InMemoryApiServer::new();
        store
            .create(
                &SERVICES,
                None,
                &json!({ "metadata": { "name": "svc" }, "spec": { "a": 1, "b": 2 } }),
            )
            .await
            .unwrap();

        let patched = store
            .patch(&SERVICES, None, "svc", &json!({ "spec": { "b": null, "c": 3 } }))
            .await
            .unwrap();
        assert_eq!(patched["spec"], json!({ "a": 1, "c": 3 }));
        assert_eq!(patched["metadata"]["resourceVersion"], "2");

        let err = store
            .patch(&SERVICES, None, "missing", &json!({}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_filters_by_namespace_and_labels() {
        let store = InMemoryApiServer::new();
        store.create(&PLANS, Some("a"), &plan("p2", "s1")).await.unwrap();
        store.create(&PLANS, Some("b"), &plan("p1", "s1")).await.unwrap();
        store.create(&PLANS, Some("a"), &plan("p3", "s2")).await.unwrap();

        let all = store.list(&PLANS, &ListOptions::all_namespaces()).await.unwrap();
        assert_eq!(all.len(), 3);

        let in_a = store.list(&PLANS, &ListOptions::in_namespace("a")).await.unwrap();
        assert_eq!(in_a.len(), 2);

        let s1 = store
            .list(
                &PLANS,
                &ListOptions::all_namespaces().with_label_selector("serviceId=s1"),
            )
            .await
            .unwrap();
        let names: Vec<_> = s1.iter().map(|p| p["metadata"]["name"].clone()).collect();
        assert_eq!(names, vec![json!("p2"), json!("p1")]);

        let not_s1 = store
            .list(
                &PLANS,
                &ListOptions::all_namespaces().with_label_selector("serviceId!=s1"),
            )
            .await
            .unwrap();
        assert_eq!(not_s1.len(), 1);
    }

    #[tokio::test]
    async fn test_injected_failures_and_journal() {
        let store = InMemoryApiServer::new();
        store.fail_with(Verb::List, &SERVICES, 500);

        let err = store
            .list(&SERVICES, &ListOptions::all_namespaces())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));

        store.clear_failures();
        assert!(store.list(&SERVICES, &ListOptions::all_namespaces()).await.is_ok());

        let calls = store.calls().await;
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.verb == Verb::List && c.plural == "sfservices"));
    }

    #[test]
    fn test_merge_patch_replaces_non_objects() {
        let mut target = json!({ "tags": ["a"], "nested": { "x": 1 } });
        merge_patch(&mut target, &json!({ "tags": ["b"], "nested": "flat" }));
        assert_eq!(target, json!({ "tags": ["b"], "nested": "flat" }));
    }

    #[test]
    fn test_label_selector_parse() {
        let selector = LabelSelector::parse("serviceId==s1, planId!=p, managed").unwrap();
        assert_eq!(
            selector.0,
            vec![
                Requirement::Equals("serviceId".into(), "s1".into()),
                Requirement::NotEquals("planId".into(), "p".into()),
                Requirement::Exists("managed".into()),
            ]
        );
        assert!(LabelSelector::parse("=v").is_err());
    }
}
