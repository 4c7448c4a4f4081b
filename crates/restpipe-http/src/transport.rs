//! HTTP transport backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;

use restpipe_core::{Error, Headers, HttpRequest, HttpResponse, Method, Result, Transport};

/// Configuration for [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Socket-level timeout for one exchange, connect to last body byte.
    pub request_timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// `Transport` implementation over a shared `reqwest::Client`.
///
/// The inner client keeps its own connection pool; one transport instance
/// serves every concurrent send on the pipeline it terminates.
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .expect("failed to build reqwest client");
        Self { http }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .http
            .request(reqwest_method(request.method()), request.url());

        for (name, value) in request.headers().iter() {
            builder = builder.header(name, value);
        }
        if !request.body().is_empty() {
            builder = builder.body(request.body().as_bytes().to_vec());
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| Error::transport(request, e.to_string()))?;

        let status = resp.status().as_u16();
        let mut headers = Headers::new();
        for (name, value) in resp.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str(), v);
            }
        }
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::transport(request, e.to_string()))?;

        Ok(HttpResponse::new(status, headers, body, request))
    }
}
