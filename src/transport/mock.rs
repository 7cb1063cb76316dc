// src/transport/mock.rs
// In-memory transport for unit tests. Unknown URLs answer 404.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use super::{Response, Transport};
use crate::error::Result;

#[derive(Default)]
pub struct MockTransport {
    responses: HashMap<String, Response>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with `status` for `url`
    pub fn with(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), Response::new(status, body));
        self
    }

    /// Every URL requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &Url) -> Result<Response> {
        self.requests.lock().unwrap().push(url.to_string());

        Ok(self
            .responses
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| Response::new(404, "")))
    }
}
