//! Error taxonomy shared by the pipeline and the operations layer.

use thiserror::Error;

use crate::request::{HttpRequest, Method};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the pipeline, the transport and the operations layer.
///
/// Variants raised while a request is in flight carry the method and URL of
/// the last request attempted.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection-level failure (DNS, connect, TLS, socket timeout).
    #[error("transport error for {method} {url}: {message}")]
    Transport {
        method: Method,
        url: String,
        message: String,
    },

    /// The service replied with a non-success status.
    #[error("HTTP {status} for {method} {url}")]
    HttpStatus {
        status: u16,
        method: Method,
        url: String,
        body: String,
    },

    /// The request was cancelled or its deadline expired.
    #[error("request cancelled: {method} {url}")]
    Cancelled { method: Method, url: String },

    /// Required caller input was missing. Raised before any network call and
    /// never retried.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A request body could not be serialized.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// A response body did not match its declared content type.
    #[error("decode error ({content_type}): {message}")]
    Decode {
        content_type: String,
        message: String,
    },

    /// The operation is recognised but not supported yet.
    #[error("operation not implemented: {operation}")]
    Unimplemented { operation: String },
}

impl Error {
    pub fn transport(request: &HttpRequest, message: impl Into<String>) -> Self {
        Self::Transport {
            method: request.method(),
            url: request.url().to_string(),
            message: message.into(),
        }
    }

    pub fn cancelled(request: &HttpRequest) -> Self {
        Self::Cancelled {
            method: request.method(),
            url: request.url().to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unimplemented(operation: impl Into<String>) -> Self {
        Self::Unimplemented {
            operation: operation.into(),
        }
    }

    /// Returns `true` if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::HttpStatus { status, .. } => {
                matches!(status, 408 | 429) || *status >= 500
            }
            _ => false,
        }
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
