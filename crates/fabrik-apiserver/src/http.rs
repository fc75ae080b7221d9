//! HTTP binding for a Kubernetes-style API server

use crate::client::{ApiServerClient, ListOptions};
use crate::config::ApiServerConfig;
use crate::error::{ApiServerError, Result};
use crate::resources::ResourceKind;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const MERGE_PATCH: &str = "application/merge-patch+json";

/// REST client for the declarative store
pub struct HttpApiServer {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApiServer {
    /// Create a new client from connection settings
    pub fn new(config: &ApiServerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `/apis/{group}/{version}[/namespaces/{ns}]/{plural}[/{name}]`
    fn resource_url(&self, kind: &ResourceKind, namespace: Option<&str>, name: Option<&str>) -> String {
        let mut url = format!("{}/apis/{}/{}", self.base_url, kind.group, kind.version);
        if let (true, Some(ns)) = (kind.namespaced, namespace) {
            url.push_str("/namespaces/");
            url.push_str(ns);
        }
        url.push('/');
        url.push_str(kind.plural);
        if let Some(name) = name {
            url.push('/');
            url.push_str(name);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn handle_response(&self, response: Response) -> Result<Value> {
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiServerError::remote(status.as_u16(), status_message(&body)))
        }
    }
}

/// Prefer the `message` of a Status object over the raw body
fn status_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl ApiServerClient for HttpApiServer {
    async fn create(
        &self,
        kind: &ResourceKind,
        namespace: Option<&str>,
        body: &Value,
    ) -> Result<Value> {
        let url = self.resource_url(kind, namespace, None);
        debug!(%url, kind = kind.kind, "POST");
        let response = self.authorize(self.client.post(&url)).json(body).send().await?;
        self.handle_response(response).await
    }

    async fn patch(
        &self,
        kind: &ResourceKind,
        namespace: Option<&str>,
        name: &str,
        body: &Value,
    ) -> Result<Value> {
        let url = self.resource_url(kind, namespace, Some(name));
        debug!(%url, kind = kind.kind, "PATCH");
        let response = self
            .authorize(self.client.patch(&url))
            .header(CONTENT_TYPE, MERGE_PATCH)
            .body(serde_json::to_vec(body)?)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn list(&self, kind: &ResourceKind, options: &ListOptions) -> Result<Vec<Value>> {
        let url = self.resource_url(kind, options.namespace.as_deref(), None);
        debug!(%url, kind = kind.kind, selector = ?options.label_selector, "GET");
        let mut request = self.authorize(self.client.get(&url));
        if let Some(selector) = &options.label_selector {
            request = request.query(&[("labelSelector", selector)]);
        }
        let response = request.send().await?;

        match self.handle_response(response).await? {
            Value::Object(mut list) => match list.remove("items") {
                Some(Value::Array(items)) => Ok(items),
                Some(Value::Null) | None => Ok(Vec::new()),
                Some(_) => Err(ApiServerError::MalformedResource(format!(
                    "{} list items is not an array",
                    kind.plural
                ))),
            },
            _ => Err(ApiServerError::MalformedResource(format!(
                "{} list is not an object",
                kind.plural
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{CUSTOM_RESOURCE_DEFINITIONS, EVENTS, PLANS};

    fn client() -> HttpApiServer {
        HttpApiServer::new(&ApiServerConfig {
            url: "http://localhost:8001/".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_client_creation() {
        assert_eq!(client().base_url(), "http://localhost:8001");
    }

    #[test]
    fn test_resource_urls() {
        let c = client();
        assert_eq!(
            c.resource_url(&PLANS, Some("fabrik"), None),
            "http://localhost:8001/apis/osb.servicefabrik.io/v1alpha1/namespaces/fabrik/sfplans"
        );
        assert_eq!(
            c.resource_url(&EVENTS, None, None),
            "http://localhost:8001/apis/instance.servicefabrik.io/v1alpha1/sfevents"
        );
        assert_eq!(
            c.resource_url(&CUSTOM_RESOURCE_DEFINITIONS, Some("ignored"), Some("x.y")),
            "http://localhost:8001/apis/apiextensions.k8s.io/v1/customresourcedefinitions/x.y"
        );
    }

    #[test]
    fn test_status_message() {
        assert_eq!(
            status_message(r#"{"kind":"Status","message":"already exists","code":409}"#),
            "already exists"
        );
        assert_eq!(status_message("boom"), "boom");
    }
}
