//! Network trace logging.

use std::time::Instant;

use async_trait::async_trait;

use crate::error::Result;
use crate::request::HttpRequest;
use crate::response::HttpResponse;

use super::{Next, Policy};

/// Logs each request on the way in and its outcome on the way back.
///
/// Placed after the retry policy this logs every attempt; placed before it,
/// only the final outcome. Logging is the policy's only side effect; the
/// request and response pass through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkTracePolicy;

#[async_trait]
impl Policy for NetworkTracePolicy {
    async fn send(&self, request: &mut HttpRequest, next: Next<'_>) -> Result<HttpResponse> {
        let started = Instant::now();
        tracing::debug!(method = %request.method(), url = request.url(), "sending request");

        let result = next.run(request).await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(response) => {
                tracing::debug!(status = response.status(), elapsed_ms, "request complete");
            }
            Err(e) => {
                tracing::debug!(error = %e, elapsed_ms, "request failed");
            }
        }
        result
    }
}
