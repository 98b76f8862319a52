//! Synchronous client core for the Spin Chimp text-spinning API.
//!
//! # Overview
//! Validates loosely-typed operation parameters against a static per-operation
//! schema, builds the wire request, and maps the plain-text response (including
//! in-band `failed:` errors) to a typed result.
//!
//! # Design
//! - `schema` is the single operation catalog; nothing mutates it.
//! - `resolve::resolve` is the only producer of `ResolvedRequest`, so no
//!   unvalidated parameter reaches the wire.
//! - `RequestEngine` splits each call into `build_request` and
//!   `parse_response` (host-does-IO); `invoke` joins them over a `Transport`.
//! - `SpinChimpClient` is the facade: one method per documented operation.
//! - With the default `ureq` feature, `UreqTransport` performs real HTTP.

pub mod classify;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod resolve;
pub mod schema;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;
pub mod validate;

pub use client::SpinChimpClient;
pub use config::{ClientConfig, Credentials};
pub use engine::RequestEngine;
pub use error::{ApiError, ConfigError, ServiceError, ServiceErrorKind, TransportError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use resolve::{resolve, ParameterSet, ResolvedRequest};
pub use schema::{Constraint, Operation, OperationSpec};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::ResponseTable;
