//! Registry operations — the caller-facing resource-management surface.

use restpipe_core::{Error, Result};

use crate::entities::Registry;
use crate::rest_client::RegistriesClient;

/// Ambient identifiers every operation runs under.
#[derive(Debug, Clone, Default)]
pub struct OperationScope {
    pub subscription_id: String,
    pub resource_group_name: String,
    /// Default registry name; `get` falls back to this when the caller
    /// passes none.
    pub registry_name: Option<String>,
}

/// Caller-facing operations over registries.
///
/// Forwards to [`RegistriesClient`] and wraps raw service objects into
/// [`Registry`] entities. Instances are cheap to share; the underlying
/// pipeline handles concurrent use.
pub struct RegistryOperations {
    scope: OperationScope,
    client: RegistriesClient,
}

impl RegistryOperations {
    pub fn new(scope: OperationScope, client: RegistriesClient) -> Self {
        Self { scope, client }
    }

    /// List all registries in the current subscription.
    pub async fn list(&self) -> Result<Vec<Registry>> {
        tracing::info!(subscription = %self.scope.subscription_id, "Registry.List start");
        let result: Result<Vec<Registry>> = async {
            let objs = self
                .client
                .list_by_subscription(&self.scope.subscription_id)
                .await?;
            objs.into_iter().map(Registry::from_rest_object).collect()
        }
        .await;
        match &result {
            Ok(items) => tracing::info!(count = items.len(), "Registry.List complete"),
            Err(e) => tracing::warn!(error = %e, "Registry.List failed"),
        }
        result
    }

    /// Get a registry by name, falling back to the scope's default name.
    ///
    /// Fails with [`Error::Validation`] before any network call when
    /// neither an argument nor a default name is available.
    pub async fn get(&self, name: Option<&str>) -> Result<Registry> {
        let registry_name = self.resolve_registry_name(name)?;
        tracing::info!(registry = registry_name, "Registry.Get start");
        let result = async {
            let obj = self
                .client
                .get(
                    &self.scope.subscription_id,
                    &self.scope.resource_group_name,
                    registry_name,
                )
                .await?;
            Registry::from_rest_object(obj)
        }
        .await;
        match &result {
            Ok(registry) => tracing::info!(registry = %registry.name, "Registry.Get complete"),
            Err(e) => tracing::warn!(error = %e, "Registry.Get failed"),
        }
        result
    }

    /// Create or update a registry.
    ///
    /// Recognised but not supported yet; callers distinguish this from a
    /// genuine failure by matching [`Error::Unimplemented`].
    pub async fn begin_create_or_update(&self, _registry: &Registry) -> Result<Registry> {
        Err(Error::unimplemented("Registry.BeginCreateOrUpdate"))
    }

    fn resolve_registry_name<'a>(&'a self, name: Option<&'a str>) -> Result<&'a str> {
        name.or(self.scope.registry_name.as_deref()).ok_or_else(|| {
            Error::validation(
                "provide a registry name or configure a default name on the operation scope",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RestRegistry;

    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use bytes::Bytes;

    use restpipe_core::{Headers, HttpRequest, HttpResponse, Transport};
    use restpipe_http::PipelineClient;

    const ENDPOINT: &str = "https://management.example.com";

    /// Serves canned JSON per URL substring and records every URL hit.
    struct CannedTransport {
        urls: Mutex<Vec<String>>,
        routes: Vec<(&'static str, String)>,
    }

    impl CannedTransport {
        fn new(routes: Vec<(&'static str, String)>) -> Arc<Self> {
            Arc::new(Self { urls: Mutex::new(Vec::new()), routes })
        }

        fn hits(&self) -> usize {
            self.urls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn send(&self, request: &HttpRequest) -> restpipe_core::Result<HttpResponse> {
            self.urls.lock().unwrap().push(request.url().to_string());
            let body = self
                .routes
                .iter()
                .find(|(needle, _)| request.url().contains(needle))
                .map(|(_, body)| body.clone())
                .unwrap_or_else(|| r#"{"error":"no route"}"#.to_string());
            let mut headers = Headers::new();
            headers.insert("content-type", "application/json");
            Ok(HttpResponse::new(200, headers, Bytes::from(body), request))
        }
    }

    fn operations(transport: Arc<CannedTransport>, default_name: Option<&str>) -> RegistryOperations {
        let client = PipelineClient::builder(ENDPOINT)
            .transport(transport)
            .build();
        RegistryOperations::new(
            OperationScope {
                subscription_id: "sub-123".into(),
                resource_group_name: "rg-1".into(),
                registry_name: default_name.map(str::to_string),
            },
            RegistriesClient::new(client),
        )
    }

    fn registry_json(name: &str) -> String {
        format!(r#"{{"name":"{name}","location":"westus"}}"#)
    }

    #[tokio::test]
    async fn get_without_name_or_default_is_a_validation_error_before_any_call() {
        let transport = CannedTransport::new(vec![]);
        let ops = operations(transport.clone(), None);

        let err = ops.get(None).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "got {err:?}");
        assert_eq!(transport.hits(), 0, "no network call may happen");
    }

    #[tokio::test]
    async fn get_falls_back_to_the_scope_default() {
        let transport = CannedTransport::new(vec![(
            "/resourceGroups/rg-1/registries/fallback",
            registry_json("fallback"),
        )]);
        let ops = operations(transport.clone(), Some("fallback"));

        let registry = ops.get(None).await.unwrap();
        assert_eq!(registry.name, "fallback");
        assert_eq!(transport.hits(), 1);
    }

    #[tokio::test]
    async fn explicit_name_wins_over_the_default() {
        let transport = CannedTransport::new(vec![(
            "/registries/explicit",
            registry_json("explicit"),
        )]);
        let ops = operations(transport.clone(), Some("fallback"));

        let registry = ops.get(Some("explicit")).await.unwrap();
        assert_eq!(registry.name, "explicit");
    }

    #[tokio::test]
    async fn list_follows_next_link_and_maps_entities() {
        let page2_url = format!("{ENDPOINT}/subscriptions/sub-123/registries?page=2");
        let page1 = format!(
            r#"{{"value":[{}],"nextLink":"{page2_url}"}}"#,
            registry_json("one")
        );
        let page2 = format!(r#"{{"value":[{}]}}"#, registry_json("two"));
        let transport = CannedTransport::new(vec![("page=2", page2), ("registries", page1)]);
        let ops = operations(transport.clone(), None);

        let registries = ops.list().await.unwrap();
        assert_eq!(transport.hits(), 2, "one call per page");
        let names: Vec<&str> = registries.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn create_is_a_tagged_unimplemented_error() {
        let transport = CannedTransport::new(vec![]);
        let ops = operations(transport.clone(), None);

        let registry = Registry::from_rest_object(RestRegistry {
            name: Some("new".into()),
            location: Some("westus".into()),
            ..RestRegistry::default()
        })
        .unwrap();

        let err = ops.begin_create_or_update(&registry).await.unwrap_err();
        match err {
            Error::Unimplemented { operation } => {
                assert_eq!(operation, "Registry.BeginCreateOrUpdate");
            }
            other => panic!("expected Unimplemented, got {other:?}"),
        }
        assert_eq!(transport.hits(), 0);
    }
}
