//! HTTP response wire type.

use std::borrow::Cow;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::request::{Headers, HttpRequest, Method};

/// How much of an error body is kept for diagnostics.
const MAX_ERROR_BODY: usize = 512;

/// Method + URL snapshot of the request that produced a response.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    method: Method,
    url: String,
}

impl RequestInfo {
    pub(crate) fn of(request: &HttpRequest) -> Self {
        Self {
            method: request.method(),
            url: request.url().to_string(),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// The result of sending an [`HttpRequest`].
///
/// The body is materialized. When a content-decode policy ran, the parsed
/// JSON value is available through [`HttpResponse::decoded`] alongside the
/// untouched raw body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    headers: Headers,
    body: Bytes,
    request: RequestInfo,
    decoded: Option<Value>,
}

impl HttpResponse {
    pub fn new(status: u16, headers: Headers, body: Bytes, request: &HttpRequest) -> Self {
        Self {
            status,
            headers,
            body,
            request: RequestInfo::of(request),
            decoded: None,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// The `content-type` header, without parameters.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get("content-type")
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim())
    }

    /// The request that produced this response.
    pub fn request(&self) -> &RequestInfo {
        &self.request
    }

    /// Parsed JSON body, when a content-decode policy materialized it.
    pub fn decoded(&self) -> Option<&Value> {
        self.decoded.as_ref()
    }

    pub fn set_decoded(&mut self, value: Value) {
        self.decoded = Some(value);
    }

    /// Deserialize the body, reusing the decoded value when present.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        match &self.decoded {
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| self.decode_error(e)),
            None => serde_json::from_slice(&self.body).map_err(|e| self.decode_error(e)),
        }
    }

    /// Turn a non-success response into an [`Error::HttpStatus`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let mut body = self.body_text().into_owned();
        body.truncate(MAX_ERROR_BODY);
        Err(Error::HttpStatus {
            status: self.status,
            method: self.request.method,
            url: self.request.url,
            body,
        })
    }

    fn decode_error(&self, err: serde_json::Error) -> Error {
        Error::Decode {
            content_type: self.content_type().unwrap_or("unknown").to_string(),
            message: err.to_string(),
        }
    }
}
