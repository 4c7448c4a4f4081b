//! Structured-content decoding for responses.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::request::HttpRequest;
use crate::response::HttpResponse;

use super::{Next, Policy};

/// Parses structured response bodies on the way back through the chain.
///
/// When the declared content type is JSON, the body is parsed and attached
/// to the response via [`HttpResponse::set_decoded`]; the raw body stays in
/// place. A body that does not match its declared type is a
/// [`Error::Decode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentDecodePolicy;

fn is_json(content_type: &str) -> bool {
    let essence = content_type.to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

#[async_trait]
impl Policy for ContentDecodePolicy {
    async fn send(&self, request: &mut HttpRequest, next: Next<'_>) -> Result<HttpResponse> {
        let mut response = next.run(request).await?;
        let content_type = response.content_type().map(str::to_owned);
        if let Some(ct) = content_type {
            if is_json(&ct) && !response.body().is_empty() {
                let value = serde_json::from_slice(response.body()).map_err(|e| Error::Decode {
                    content_type: ct,
                    message: e.to_string(),
                })?;
                response.set_decoded(value);
            }
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use crate::request::{Headers, Method};
    use crate::transport::Transport;

    use std::sync::Arc;

    use bytes::Bytes;

    struct CannedTransport {
        content_type: &'static str,
        body: &'static str,
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
            let mut headers = Headers::new();
            headers.insert("content-type", self.content_type);
            Ok(HttpResponse::new(
                200,
                headers,
                Bytes::from_static(self.body.as_bytes()),
                request,
            ))
        }
    }

    fn pipeline(content_type: &'static str, body: &'static str) -> Pipeline {
        Pipeline::new(
            vec![Arc::new(ContentDecodePolicy)],
            Arc::new(CannedTransport { content_type, body }),
        )
    }

    fn request() -> HttpRequest {
        HttpRequest::new(Method::Get, "https://svc.example.com/items")
    }

    #[tokio::test]
    async fn json_body_is_decoded_and_raw_body_kept() {
        let response = pipeline("application/json; charset=utf-8", r#"{"name":"primary"}"#)
            .send(request())
            .await
            .unwrap();
        assert_eq!(
            response.decoded().and_then(|v| v["name"].as_str()),
            Some("primary")
        );
        assert_eq!(response.body_text(), r#"{"name":"primary"}"#);
    }

    #[tokio::test]
    async fn json_suffix_types_are_decoded() {
        let response = pipeline("application/vnd.registry+json", r#"{"ok":true}"#)
            .send(request())
            .await
            .unwrap();
        assert!(response.decoded().is_some());
    }

    #[tokio::test]
    async fn non_json_bodies_pass_through_untouched() {
        let response = pipeline("text/plain", "hello").send(request()).await.unwrap();
        assert!(response.decoded().is_none());
        assert_eq!(response.body_text(), "hello");
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let err = pipeline("application/json", "{oops").send(request()).await.unwrap_err();
        match err {
            Error::Decode { content_type, .. } => assert_eq!(content_type, "application/json"),
            other => panic!("expected Decode, got {other:?}"),
        }
    }
}
