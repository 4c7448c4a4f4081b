//! Thin REST client for the registries surface.
//!
//! Mirrors the shape of a generated service client: URL construction, paged
//! listing and response decoding. Every call goes through the shared
//! pipeline, so retry, decoding and tracing apply uniformly.

use serde::Deserialize;

use restpipe_core::{HttpRequest, Method, Result};
use restpipe_http::PipelineClient;

const API_VERSION: &str = "2023-10-01";

/// One page of a registry listing.
#[derive(Debug, Deserialize)]
pub struct RegistryListPage {
    #[serde(default)]
    pub value: Vec<crate::entities::RestRegistry>,
    #[serde(rename = "nextLink", default)]
    pub next_link: Option<String>,
}

/// REST client for registry resources.
pub struct RegistriesClient {
    client: PipelineClient,
}

impl RegistriesClient {
    pub fn new(client: PipelineClient) -> Self {
        Self { client }
    }

    /// List registries under a subscription, following `nextLink` paging
    /// until the service stops returning one.
    pub async fn list_by_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Vec<crate::entities::RestRegistry>> {
        let first = format!(
            "/subscriptions/{subscription_id}/registries?api-version={API_VERSION}"
        );

        let mut items = Vec::new();
        let mut pages = 0u32;
        // nextLink is absolute; format_url passes absolute URLs through.
        let mut next = Some(self.client.format_url(&first));
        while let Some(url) = next {
            let request = HttpRequest::new(Method::Get, url);
            let response = self.client.send_request(request).await?.error_for_status()?;
            let page: RegistryListPage = response.json()?;
            items.extend(page.value);
            next = page.next_link;
            pages += 1;
        }
        tracing::debug!(pages, count = items.len(), "listed registries");
        Ok(items)
    }

    /// Fetch a single registry by resource group and name.
    pub async fn get(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
    ) -> Result<crate::entities::RestRegistry> {
        let path = format!(
            "/subscriptions/{subscription_id}/resourceGroups/{resource_group}/registries/{name}?api-version={API_VERSION}"
        );
        let response = self
            .client
            .send_request(self.client.get(&path))
            .await?
            .error_for_status()?;
        response.json()
    }
}
