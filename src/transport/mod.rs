// src/transport/mod.rs
// =============================================================================
// The one network capability the rest of the program uses: HTTP GET.
//
// Submodules:
// - http: the real transport, a thin wrapper around reqwest::Client
// - cache: an on-disk response cache that decorates any other transport
// - mock: an in-memory transport for unit tests
//
// Nothing outside this module talks to reqwest directly. The index builder
// and the resolver receive a `&dyn Transport`, so they work the same over the
// plain client, the cached client, or the test mock.
// =============================================================================

mod cache;
mod http;
#[cfg(test)]
pub mod mock;

pub use cache::{CachedTransport, ExpiryRules};
pub use http::HttpTransport;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::Result;

/// Status code and text body of a completed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 OK
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// 404 Not Found
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Anything that can GET a URL.
///
/// An `Err` means no response was obtained at all. Every HTTP status,
/// including 404 and 5xx, comes back as `Ok(Response)`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Response>;
}

/// Builds the process-wide transport: plain HTTP, wrapped in the response
/// cache when a cache directory is configured.
pub fn build(config: &Config) -> Result<Box<dyn Transport>> {
    let http = HttpTransport::new(&config.user_agent, config.timeout)?;

    match &config.cache_dir {
        Some(dir) => {
            debug!("Response cache enabled at {}", dir.display());
            let rules = ExpiryRules::for_endpoints(&config.endpoints);
            Ok(Box::new(CachedTransport::new(http, dir.clone(), rules)))
        }
        None => Ok(Box::new(http)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_response_status_helpers() {
        assert!(Response::new(200, "ok").is_ok());
        assert!(Response::new(404, "").is_not_found());
        assert!(!Response::new(500, "").is_ok());
        assert!(!Response::new(500, "").is_not_found());
    }

    #[test]
    fn test_build_with_and_without_cache() {
        let cli = Cli::parse_from(["rfc-cli", "show", "1"]);
        let config = Config::from_cli(&cli).unwrap();
        assert!(build(&config).is_ok());

        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().to_str().unwrap().to_string();
        let cli = Cli::parse_from(["rfc-cli", "--cache", "--cache-dir", &cache_dir, "show", "1"]);
        let config = Config::from_cli(&cli).unwrap();
        assert!(build(&config).is_ok());
    }
}
