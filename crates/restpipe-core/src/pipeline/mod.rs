//! Policy engine — the composable request/response pipeline.
//!
//! A pipeline is an ordered list of policies terminating in a transport:
//! ```text
//! Request → [HeadersPolicy] → [UserAgentPolicy] → [ContentDecodePolicy]
//!         → [RetryPolicy] → [NetworkTracePolicy] → Transport
//! ```
//! Each policy sees the request on the way forward and the response on the
//! way back, in exact reverse order. A policy short-circuits by returning a
//! response without calling [`Next::run`]; a retrying policy re-enters the
//! chain from its own position by calling it again.

pub mod decode;
pub mod headers;
pub mod retry;
pub mod trace;

pub use decode::ContentDecodePolicy;
pub use headers::{HeadersPolicy, UserAgentPolicy};
pub use retry::{RetryConfig, RetryPolicy};
pub use trace::NetworkTracePolicy;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::request::HttpRequest;
use crate::response::HttpResponse;
use crate::transport::Transport;

/// A unit of cross-cutting request/response behavior.
///
/// Code before `next.run(...)` is the forward hook, code after it is the
/// backward hook. Returning without invoking `next` short-circuits the rest
/// of the chain; returning `Err` aborts and unwinds through the policies
/// already entered.
///
/// Policies are constructed once and shared across concurrent sends, so
/// implementations must not keep per-request state in `&self`; the request
/// context is the place for that.
#[async_trait]
pub trait Policy: Send + Sync + 'static {
    async fn send(&self, request: &mut HttpRequest, next: Next<'_>) -> Result<HttpResponse>;
}

/// The tail of the chain after the current policy.
///
/// Cloneable so a policy may run the remainder more than once (retry).
#[derive(Clone)]
pub struct Next<'a> {
    chain: &'a [Arc<dyn Policy>],
}

impl Next<'_> {
    /// Invoke the next policy in the chain.
    pub async fn run(&self, request: &mut HttpRequest) -> Result<HttpResponse> {
        let (policy, tail) = self
            .chain
            .split_first()
            .expect("pipeline chain always terminates in the transport policy");
        policy.send(request, Next { chain: tail }).await
    }
}

/// Ordered composition of policies plus one terminal transport.
///
/// Constructed once and shared; `send` may be invoked from many tasks
/// concurrently. For a single call the forward order is exactly the declared
/// policy order and the backward order is its exact reverse; independent
/// concurrent sends have no ordering relative to each other.
pub struct Pipeline {
    chain: Vec<Arc<dyn Policy>>,
}

impl Pipeline {
    /// Build a pipeline from caller-ordered policies and a transport.
    ///
    /// The transport is appended as the terminal element of the chain.
    pub fn new(policies: Vec<Arc<dyn Policy>>, transport: Arc<dyn Transport>) -> Self {
        let mut chain = policies;
        chain.push(Arc::new(TransportPolicy::new(transport)) as Arc<dyn Policy>);
        Self { chain }
    }

    /// Number of chain elements, including the terminal transport policy.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Drive `request` through the chain and return the final response.
    ///
    /// The request carries its own per-call context, created fresh at
    /// construction unless the caller installed one.
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse> {
        Next { chain: &self.chain }.run(&mut request).await
    }
}

/// Terminal policy: hands the request to the transport.
///
/// Checks cancellation before dispatch and enforces the context deadline
/// around the transport call, surfacing expiry as [`Error::Cancelled`].
pub struct TransportPolicy {
    transport: Arc<dyn Transport>,
}

impl TransportPolicy {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Policy for TransportPolicy {
    async fn send(&self, request: &mut HttpRequest, _next: Next<'_>) -> Result<HttpResponse> {
        if request.context().is_cancelled() {
            return Err(Error::cancelled(request));
        }
        match request.context().time_remaining() {
            Some(remaining) => {
                match tokio::time::timeout(remaining, self.transport.send(request)).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::cancelled(request)),
                }
            }
            None => self.transport.send(request).await,
        }
    }
}
