//! Executes content requests and normalizes their outcome.
//!
//! # Design
//! `FetchExecutor` pairs the stateless `ContentClient` with a shared
//! `Transport`. Every failure after validation (transport, status, JSON,
//! response shape) comes back as `Err` inside the `FetchResult` value, so a
//! caller awaiting a fetch never has to handle a panic or an early return.
//! Validation happens before the first await and is the only error surfaced
//! outside the result.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::client::{ContentClient, FetchRequest, FetchResult};
use crate::config::ClientConfig;
use crate::error::ValidationError;
use crate::http::{HttpRequest, Transport};
use crate::types::{ContentTypeDescriptor, RequestOptions, Subject, TriggerMessage};

/// Something a resource loop can fetch in response to a trigger.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch data for `trigger`. Validation errors abort before any I/O;
    /// everything else is folded into the returned `FetchResult`.
    async fn fetch(&self, trigger: &TriggerMessage) -> Result<FetchResult, ValidationError>;
}

/// Resolves content requests with a `ContentClient` and sends them over a
/// shared `Transport`. Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct FetchExecutor {
    client: ContentClient,
    transport: Arc<dyn Transport>,
}

impl FetchExecutor {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            client: ContentClient::new(base_url),
            transport,
        }
    }

    /// Executor for content routes under `config.content_base_url()`.
    pub fn from_config(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self::new(&config.content_base_url(), transport)
    }

    pub fn client(&self) -> &ContentClient {
        &self.client
    }

    /// Issue `fetch` and normalize its response.
    pub async fn execute(&self, fetch: &FetchRequest) -> FetchResult {
        debug!(url = %fetch.url(), slug = fetch.is_slug_request(), "fetching content");
        let response = self.transport.execute(fetch.request.clone()).await?;
        self.client.parse_fetch(fetch, response)
    }

    /// Resolve and fetch `subject` of `descriptor`.
    pub async fn fetch_content(
        &self,
        descriptor: &ContentTypeDescriptor,
        subject: &Subject,
        options: &RequestOptions,
    ) -> Result<FetchResult, ValidationError> {
        let fetch = self.client.build_fetch(descriptor, subject, options)?;
        Ok(self.execute(&fetch).await)
    }

    /// Register a custom route, e.g. `register_route("wp/v2", "all-terms")`.
    /// The returned `Route` owns its own handle on the transport.
    pub fn register_route(&self, namespace: &str, path: &str) -> Route {
        Route {
            request: self.client.build_route(namespace, path),
            executor: self.clone(),
        }
    }
}

/// A fixed GET endpoint produced by `FetchExecutor::register_route`.
#[derive(Clone)]
pub struct Route {
    request: HttpRequest,
    executor: FetchExecutor,
}

impl Route {
    pub fn url(&self) -> &str {
        &self.request.url
    }

    pub async fn get(&self) -> FetchResult {
        debug!(url = %self.request.url, "fetching route");
        let response = self.executor.transport.execute(self.request.clone()).await?;
        self.executor.client.parse_json(response)
    }
}

#[async_trait]
impl Fetch for Route {
    async fn fetch(&self, _trigger: &TriggerMessage) -> Result<FetchResult, ValidationError> {
        Ok(self.get().await)
    }
}

/// Content-type fetch whose subject comes from the trigger's `id`.
///
/// Triggers without an id fetch `default_subject`.
#[derive(Clone)]
pub struct ContentFetch {
    executor: FetchExecutor,
    descriptor: ContentTypeDescriptor,
    options: RequestOptions,
    default_subject: Subject,
}

impl ContentFetch {
    pub fn new(executor: FetchExecutor, descriptor: ContentTypeDescriptor) -> Self {
        Self {
            executor,
            descriptor,
            options: RequestOptions::default(),
            default_subject: Subject::List(Vec::new()),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_default_subject(mut self, subject: impl Into<Subject>) -> Self {
        self.default_subject = subject.into();
        self
    }
}

#[async_trait]
impl Fetch for ContentFetch {
    async fn fetch(&self, trigger: &TriggerMessage) -> Result<FetchResult, ValidationError> {
        let subject = trigger.id.as_ref().unwrap_or(&self.default_subject);
        self.executor
            .fetch_content(&self.descriptor, subject, &self.options)
            .await
    }
}
