// src/transport/http.rs
// =============================================================================
// The real transport: GET requests through a single reqwest::Client.
//
// The client is built once and reused for every request (connection
// pooling). We never retry; a failed request is reported once.
//
// Rust concepts:
// - async/await: reqwest is async, we await each request in turn
// - Result<T, E>: transport failures become error::Error::Request
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{Response, Transport};
use crate::error::{Error, Result};

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    // Creates the HTTP client
    //
    // Parameters:
    //   user_agent: sent with every request
    //   timeout: per-request timeout, or None for reqwest's default (no timeout)
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(Error::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<Response> {
        debug!("GET {}", url);

        let request_error = |source: reqwest::Error| Error::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(request_error)?;

        // We keep the body for every status: listing pages are scraped
        // whatever they return, and error pages are cheap
        let status = response.status().as_u16();
        let body = response.text().await.map_err(request_error)?;

        debug!("{} -> HTTP {} ({} bytes)", url, status, body.len());
        Ok(Response::new(status, body))
    }
}
