//! Scripted transport for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Answers known URLs with canned responses and fails unknown ones with a
/// `TransportError`. Records every URL it was asked for, in call order.
#[derive(Default)]
pub struct StubTransport {
    responses: HashMap<String, (u16, String)>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(url.to_string(), (status, body.to_string()));
        self
    }

    pub fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(request.url.clone());

        if let Some(delay) = self.delays.get(&request.url) {
            tokio::time::sleep(*delay).await;
        }

        let (status, body) = self
            .responses
            .get(&request.url)
            .cloned()
            .ok_or_else(|| TransportError(format!("no route to {}", request.url)))?;

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}
