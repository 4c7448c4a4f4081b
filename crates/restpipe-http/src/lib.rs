//! restpipe-http — the reqwest transport and the `PipelineClient`.
//!
//! # Features
//! - [`ReqwestTransport`] — `Transport` implementation over a pooled
//!   `reqwest::Client` (rustls)
//! - [`PipelineClient`] — base URL + policy chain + request builders
//! - [`PipelineClientBuilder`] — typed configuration for the standard chain

pub mod client;
pub mod transport;

pub use client::{PipelineClient, PipelineClientBuilder};
pub use transport::{ReqwestTransport, TransportConfig};
