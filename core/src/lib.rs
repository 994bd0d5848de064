//! Content-fetch core for WP-API style services.
//!
//! # Overview
//! Resolves an abstract request ("fetch this content type, identified by this
//! subject") into a canonical endpoint, executes it, and funnels the
//! normalized result through per-resource loops into a merged store.
//!
//! # Design
//! - Classification, query encoding and endpoint resolution are pure and
//!   live behind `ContentClient::build_fetch` / `parse_fetch`, so the I/O
//!   boundary is explicit (host-does-IO).
//! - `Transport` is the only seam to the network; `HttpTransport` is the
//!   reqwest-backed default.
//! - `ResourceLoop` processes one trigger at a time per resource; `Store`
//!   is the single writer of the store slice.
//! - Validation failures are `Err(ValidationError)` before any request;
//!   fetch failures are values (`FetchResult`).

pub mod classify;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod executor;
pub mod http;
pub mod orchestrator;
pub mod query;
pub mod registry;
pub mod store;
pub mod types;
pub mod validate;

#[cfg(test)]
mod testing;

pub use classify::{classify, Plurality, RequestShape};
pub use client::{ContentClient, FetchRequest, FetchResult};
pub use config::ClientConfig;
pub use endpoint::{resolve, ResolvedEndpoint};
pub use error::{ConfigError, FetchError, TransportError, ValidationError, ValidationKind};
pub use executor::{ContentFetch, Fetch, FetchExecutor, Route};
pub use http::{HttpRequest, HttpResponse, HttpTransport, Transport};
pub use orchestrator::{Dispatcher, ResourceLoop};
pub use query::{QueryMap, QueryValue};
pub use registry::ContentTypeRegistry;
pub use store::{merge, reduce, Store, StoreSlice};
pub use types::{
    ContentTypeDescriptor, Identifier, ReceiveMessage, RequestOptions, ResourceKind, Subject,
    TriggerMessage,
};
