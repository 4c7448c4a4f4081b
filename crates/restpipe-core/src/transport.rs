//! The `Transport` trait — the terminal capability of every pipeline.

use async_trait::async_trait;

use crate::error::Result;
use crate::request::HttpRequest;
use crate::response::HttpResponse;

/// The component that performs actual network I/O.
///
/// A single transport instance is shared by every concurrent `send` on a
/// pipeline and manages its own connection pooling internally, opaque to
/// policies.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` for use across Tokio tasks.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn Transport>`.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Perform one network exchange.
    ///
    /// Non-success statuses are returned as responses, not errors; status
    /// classification is policy business. Errors from this method are
    /// connection-level only.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}
