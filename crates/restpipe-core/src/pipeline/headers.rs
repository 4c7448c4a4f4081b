//! Header-injection policies.

use async_trait::async_trait;

use crate::error::Result;
use crate::request::HttpRequest;
use crate::response::HttpResponse;

use super::{Next, Policy};

/// Adds a fixed set of headers to every request.
///
/// Headers already present on the request win; the policy never overwrites.
#[derive(Debug, Clone, Default)]
pub struct HeadersPolicy {
    headers: Vec<(String, String)>,
}

impl HeadersPolicy {
    pub fn new(headers: Vec<(String, String)>) -> Self {
        Self { headers }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[async_trait]
impl Policy for HeadersPolicy {
    async fn send(&self, request: &mut HttpRequest, next: Next<'_>) -> Result<HttpResponse> {
        for (name, value) in &self.headers {
            if !request.headers().contains(name) {
                request.headers_mut().insert(name, value.clone());
            }
        }
        next.run(request).await
    }
}

/// Sets the `user-agent` header unless the caller set one.
#[derive(Debug, Clone)]
pub struct UserAgentPolicy {
    agent: String,
}

impl UserAgentPolicy {
    pub fn new(agent: impl Into<String>) -> Self {
        Self { agent: agent.into() }
    }
}

impl Default for UserAgentPolicy {
    fn default() -> Self {
        Self::new(concat!("restpipe/", env!("CARGO_PKG_VERSION")))
    }
}

#[async_trait]
impl Policy for UserAgentPolicy {
    async fn send(&self, request: &mut HttpRequest, next: Next<'_>) -> Result<HttpResponse> {
        if !request.headers().contains("user-agent") {
            request.headers_mut().insert("user-agent", self.agent.clone());
        }
        next.run(request).await
    }
}
