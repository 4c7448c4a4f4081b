//! `PipelineClient` — base URL, policy chain and request builders.

use std::sync::Arc;

use restpipe_core::pipeline::{
    ContentDecodePolicy, HeadersPolicy, NetworkTracePolicy, RetryConfig, RetryPolicy,
    UserAgentPolicy,
};
use restpipe_core::{HttpRequest, HttpResponse, Method, Pipeline, Policy, Result, Transport};

use crate::transport::ReqwestTransport;

/// Client wiring a base URL to a policy pipeline.
///
/// Constructed once and shared; every request built through it is driven by
/// the same pipeline and transport.
pub struct PipelineClient {
    base_url: String,
    pipeline: Arc<Pipeline>,
}

impl PipelineClient {
    /// Start building a client for `base_url` with the standard chain.
    pub fn builder(base_url: impl Into<String>) -> PipelineClientBuilder {
        PipelineClientBuilder::new(base_url)
    }

    /// Wire an explicit, caller-ordered policy list to a transport.
    pub fn new(
        base_url: impl Into<String>,
        policies: Vec<Arc<dyn Policy>>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            pipeline: Arc::new(Pipeline::new(policies, transport)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying pipeline.
    ///
    /// Advanced callers may drive it directly with hand-built requests;
    /// ordinary use goes through [`PipelineClient::send_request`].
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Resolve `path` against the base URL, unless it is already absolute.
    /// Query parameters on the base URL are preserved.
    pub fn format_url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    pub fn request(&self, method: Method, path: &str) -> HttpRequest {
        HttpRequest::new(method, self.format_url(path))
    }

    pub fn get(&self, path: &str) -> HttpRequest {
        self.request(Method::Get, path)
    }

    pub fn head(&self, path: &str) -> HttpRequest {
        self.request(Method::Head, path)
    }

    pub fn post(&self, path: &str) -> HttpRequest {
        self.request(Method::Post, path)
    }

    pub fn put(&self, path: &str) -> HttpRequest {
        self.request(Method::Put, path)
    }

    pub fn patch(&self, path: &str) -> HttpRequest {
        self.request(Method::Patch, path)
    }

    pub fn delete(&self, path: &str) -> HttpRequest {
        self.request(Method::Delete, path)
    }

    /// Send a request through the pipeline.
    pub async fn send_request(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.pipeline.send(request).await
    }
}

/// Append `path` to `base` without losing query parameters on either side.
/// Absolute paths (scheme included) are returned as-is.
fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    let (base_root, base_query) = match base.split_once('?') {
        Some((root, query)) => (root, Some(query)),
        None => (base, None),
    };
    let (path_part, path_query) = match path.split_once('?') {
        Some((part, query)) => (part, Some(query)),
        None => (path, None),
    };

    let mut url = base_root.trim_end_matches('/').to_string();
    let path_part = path_part.trim_start_matches('/');
    if !path_part.is_empty() {
        url.push('/');
        url.push_str(path_part);
    }

    let query: Vec<&str> = base_query
        .into_iter()
        .chain(path_query)
        .filter(|q| !q.is_empty())
        .collect();
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query.join("&"));
    }
    url
}

/// Typed configuration for the standard policy chain.
///
/// The assembled forward order mirrors the canonical sample wiring:
/// headers → user-agent → content-decode → per-call policies → retry →
/// per-retry policies → network trace → transport. Per-call policies run
/// once per send; per-retry policies run once per attempt.
pub struct PipelineClientBuilder {
    base_url: String,
    default_headers: Vec<(String, String)>,
    user_agent: Option<String>,
    retry: RetryConfig,
    per_call_policies: Vec<Arc<dyn Policy>>,
    per_retry_policies: Vec<Arc<dyn Policy>>,
    transport: Option<Arc<dyn Transport>>,
}

impl PipelineClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: Vec::new(),
            user_agent: None,
            retry: RetryConfig::default(),
            per_call_policies: Vec::new(),
            per_retry_policies: Vec::new(),
            transport: None,
        }
    }

    /// Add a header sent with every request (unless the request sets it).
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Append a policy that runs once per send, before the retry policy.
    pub fn per_call_policy(mut self, policy: Arc<dyn Policy>) -> Self {
        self.per_call_policies.push(policy);
        self
    }

    /// Append a policy that runs on every attempt, after the retry policy.
    pub fn per_retry_policy(mut self, policy: Arc<dyn Policy>) -> Self {
        self.per_retry_policies.push(policy);
        self
    }

    /// Replace the default [`ReqwestTransport`], e.g. with a test double.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> PipelineClient {
        let mut policies: Vec<Arc<dyn Policy>> = Vec::new();
        policies.push(Arc::new(HeadersPolicy::new(self.default_headers)));
        match self.user_agent {
            Some(agent) => policies.push(Arc::new(UserAgentPolicy::new(agent))),
            None => policies.push(Arc::new(UserAgentPolicy::default())),
        }
        policies.push(Arc::new(ContentDecodePolicy));
        policies.extend(self.per_call_policies);
        policies.push(Arc::new(RetryPolicy::new(self.retry)));
        policies.extend(self.per_retry_policies);
        policies.push(Arc::new(NetworkTracePolicy));

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::default()));

        PipelineClient::new(self.base_url, policies, transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restpipe_core::{Error, Headers};

    use async_trait::async_trait;
    use bytes::Bytes;

    #[test]
    fn join_url_basic() {
        assert_eq!(
            join_url("https://svc.example.com", "items/1"),
            "https://svc.example.com/items/1"
        );
        assert_eq!(
            join_url("https://svc.example.com/", "/items/1"),
            "https://svc.example.com/items/1"
        );
    }

    #[test]
    fn join_url_keeps_base_query() {
        assert_eq!(
            join_url("https://svc.example.com?api-version=2023-10-01", "items"),
            "https://svc.example.com/items?api-version=2023-10-01"
        );
        assert_eq!(
            join_url("https://svc.example.com?api-version=1", "items?top=5"),
            "https://svc.example.com/items?api-version=1&top=5"
        );
    }

    #[test]
    fn join_url_leaves_absolute_paths_alone() {
        assert_eq!(
            join_url("https://svc.example.com", "https://other.example.com/x"),
            "https://other.example.com/x"
        );
    }

    #[test]
    fn join_url_empty_path_yields_base() {
        assert_eq!(join_url("https://svc.example.com/", ""), "https://svc.example.com");
    }

    struct EchoTransport;

    #[async_trait]
    impl restpipe_core::Transport for EchoTransport {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
            let mut headers = Headers::new();
            headers.insert("content-type", "application/json");
            let body = format!(r#"{{"url":"{}"}}"#, request.url());
            Ok(HttpResponse::new(200, headers, Bytes::from(body), request))
        }
    }

    #[tokio::test]
    async fn standard_chain_sends_and_decodes() {
        let client = PipelineClient::builder("https://svc.example.com?api-version=1")
            .default_header("accept", "application/json")
            .user_agent("sample/1.0")
            .transport(Arc::new(EchoTransport))
            .build();

        let response = client.send_request(client.get("registries")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.decoded().and_then(|v| v["url"].as_str()),
            Some("https://svc.example.com/registries?api-version=1")
        );
    }

    #[tokio::test]
    async fn escape_hatch_pipeline_accepts_hand_built_requests() {
        let client = PipelineClient::builder("https://svc.example.com")
            .transport(Arc::new(EchoTransport))
            .build();

        // Bypass the request builders entirely.
        let request = HttpRequest::new(Method::Get, "https://svc.example.com/raw");
        let response = client.pipeline().send(request).await.unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn transport_errors_carry_the_request() {
        struct RefusingTransport;

        #[async_trait]
        impl restpipe_core::Transport for RefusingTransport {
            async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
                Err(Error::transport(request, "connection refused"))
            }
        }

        let client = PipelineClient::builder("https://svc.example.com")
            .retry(RetryConfig { max_attempts: 1, ..RetryConfig::default() })
            .transport(Arc::new(RefusingTransport))
            .build();

        let err = client.send_request(client.get("items")).await.unwrap_err();
        match err {
            Error::Transport { url, .. } => assert_eq!(url, "https://svc.example.com/items"),
            other => panic!("expected Transport, got {other:?}"),
        }
    }
}
