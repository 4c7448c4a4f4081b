//! restpipe-registry — the registry resource-management surface.
//!
//! # Overview
//!
//! - [`RegistriesClient`] — thin REST client over a shared
//!   [`PipelineClient`](restpipe_http::PipelineClient): URL construction,
//!   paged listing, response decoding
//! - [`Registry`] / [`RestRegistry`] — domain entity and raw service object
//! - [`RegistryOperations`] — caller-facing operations (`list`, `get`,
//!   `begin_create_or_update`) resolving names against an
//!   [`OperationScope`]

pub mod entities;
pub mod operations;
pub mod rest_client;

pub use entities::{Registry, RestRegistry};
pub use operations::{OperationScope, RegistryOperations};
pub use rest_client::{RegistriesClient, RegistryListPage};
