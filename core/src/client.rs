//! Stateless request builder and response parser for the content API.
//!
//! # Design
//! `ContentClient` holds only a `base_url`. Each fetch is split into
//! `build_fetch`, which resolves the canonical endpoint into an `HttpRequest`,
//! and `parse_fetch`, which turns the matching `HttpResponse` into a
//! `FetchResult`. The caller executes the round-trip in between, keeping this
//! type deterministic and free of I/O.

use serde_json::Value;

use crate::classify::RequestShape;
use crate::endpoint::{self, ResolvedEndpoint};
use crate::error::{FetchError, ValidationError};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{ContentTypeDescriptor, RequestOptions, Subject};

/// Outcome of a fetch: the normalized JSON data, or the captured failure.
pub type FetchResult = Result<Value, FetchError>;

/// A built request together with the classification needed to normalize its
/// response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub request: HttpRequest,
    pub shape: RequestShape,
}

impl FetchRequest {
    pub fn url(&self) -> &str {
        &self.request.url
    }

    pub fn is_slug_request(&self) -> bool {
        self.shape.is_slug_request()
    }
}

/// Synchronous, stateless client for the content API.
#[derive(Debug, Clone)]
pub struct ContentClient {
    base_url: String,
}

impl ContentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve the canonical endpoint for `subject` and wrap it in a request.
    pub fn build_fetch(
        &self,
        descriptor: &ContentTypeDescriptor,
        subject: &Subject,
        options: &RequestOptions,
    ) -> Result<FetchRequest, ValidationError> {
        let ResolvedEndpoint { url, shape } =
            endpoint::resolve(&self.base_url, descriptor, subject, options)?;
        Ok(FetchRequest {
            request: HttpRequest::get(url),
            shape,
        })
    }

    /// Request for a custom route registered under `namespace`, e.g.
    /// `wp/v2` + `all-terms`.
    pub fn build_route(&self, namespace: &str, path: &str) -> HttpRequest {
        let path = path.trim_start_matches('/');
        let url = match namespace.trim_matches('/') {
            "" => format!("{}/{path}", self.base_url),
            namespace => format!("{}/{namespace}/{path}", self.base_url),
        };
        HttpRequest::get(url)
    }

    /// Normalize a content response. Slug requests hit a collection, so the
    /// first element is the logical result.
    pub fn parse_fetch(&self, fetch: &FetchRequest, response: HttpResponse) -> FetchResult {
        let data = self.parse_json(response)?;
        match &fetch.shape {
            RequestShape::Slug(slug) => first_of_collection(data, slug),
            _ => Ok(data),
        }
    }

    pub fn parse_json(&self, response: HttpResponse) -> FetchResult {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| FetchError::Deserialization(e.to_string()))
    }
}

fn first_of_collection(data: Value, slug: &str) -> FetchResult {
    match data {
        Value::Array(items) => items.into_iter().next().ok_or_else(|| FetchError::NotFound {
            slug: slug.to_string(),
        }),
        other => Err(FetchError::ProtocolMismatch(format!(
            "expected a collection for slug \"{slug}\", got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Map non-2xx status codes to `FetchError::Http`.
fn check_status(response: &HttpResponse) -> Result<(), FetchError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(FetchError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}
