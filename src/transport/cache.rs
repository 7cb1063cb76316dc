// src/transport/cache.rs
// =============================================================================
// On-disk response cache, layered over any other Transport.
//
// How it works:
// 1. Find the expiry rule for the URL (first matching pattern wins)
// 2. No rule -> pass straight through, nothing is stored
// 3. A stored entry younger than the rule's TTL -> serve it
// 4. Otherwise fetch from the inner transport and store 200 responses
//
// Each URL gets one JSON file in the cache directory. The file name is the
// URL, form-urlencoded so it is a single safe path component.
// =============================================================================

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use super::{Response, Transport};
use crate::config::Endpoints;
use crate::error::{Error, Result};

/// Directory listings change when documents are published
pub const LISTING_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// RFC text is immutable; errata notices still get refreshed
pub const RFC_TEXT_TTL: Duration = Duration::from_secs(6 * 60 * 60);
pub const DRAFT_TEXT_TTL: Duration = Duration::from_secs(3 * 60 * 60);

/// URL patterns and how long a response to a matching URL stays fresh.
#[derive(Debug, Clone, Default)]
pub struct ExpiryRules {
    rules: Vec<(Regex, Duration)>,
}

impl ExpiryRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule. Rules are tried in insertion order.
    pub fn with_rule(mut self, pattern: Regex, ttl: Duration) -> Self {
        self.rules.push((pattern, ttl));
        self
    }

    /// Listings for 24h, RFC text for 6h, draft text for 3h
    pub fn for_endpoints(endpoints: &Endpoints) -> Self {
        let rfc_base = regex::escape(endpoints.rfc_listing().as_str());
        let drafts_base = regex::escape(endpoints.drafts_listing().as_str());

        // Both bases are escaped, so these patterns always compile
        let rule = |pattern: String| Regex::new(&pattern).expect("escaped cache pattern");

        Self::new()
            .with_rule(rule(format!("^{}$", rfc_base)), LISTING_TTL)
            .with_rule(rule(format!("^{}$", drafts_base)), LISTING_TTL)
            .with_rule(
                rule(format!(r"^{}rfc[0-9]+\.(txt|json|html)$", rfc_base)),
                RFC_TEXT_TTL,
            )
            .with_rule(rule(format!("^{}.+", drafts_base)), DRAFT_TEXT_TTL)
    }

    /// TTL for `url`, or `None` when it must not be cached
    pub fn ttl_for(&self, url: &Url) -> Option<Duration> {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.is_match(url.as_str()))
            .map(|(_, ttl)| *ttl)
    }
}

// What we write to disk for each URL
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    url: String,
    /// Seconds since the Unix epoch
    fetched_at: u64,
    response: Response,
}

impl CacheEntry {
    fn age(&self) -> Duration {
        Duration::from_secs(unix_now().saturating_sub(self.fetched_at))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

pub struct CachedTransport<T> {
    inner: T,
    dir: PathBuf,
    rules: ExpiryRules,
}

impl<T: Transport> CachedTransport<T> {
    pub fn new(inner: T, dir: PathBuf, rules: ExpiryRules) -> Self {
        Self { inner, dir, rules }
    }

    fn entry_path(&self, url: &Url) -> PathBuf {
        let name: String = url::form_urlencoded::byte_serialize(url.as_str().as_bytes()).collect();
        self.dir.join(format!("{}.json", name))
    }

    // A missing, unreadable or corrupt entry is just a miss
    async fn read_entry(&self, path: &Path) -> Option<CacheEntry> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Ignoring unreadable cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Ignoring corrupt cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    async fn write_entry(&self, path: &Path, url: &Url, response: &Response) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| Error::CacheIo {
                path: self.dir.clone(),
                source,
            })?;

        let entry = CacheEntry {
            url: url.to_string(),
            fetched_at: unix_now(),
            response: response.clone(),
        };
        let json = serde_json::to_string(&entry).map_err(|source| Error::CacheEncode {
            url: url.to_string(),
            source,
        })?;

        // Write then rename, so a reader never sees half an entry
        let tmp = path.with_extension("json.tmp");
        let io_error = |source: std::io::Error| Error::CacheIo {
            path: path.to_path_buf(),
            source,
        };
        tokio::fs::write(&tmp, json).await.map_err(io_error)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_error)?;

        Ok(())
    }
}

#[async_trait]
impl<T: Transport> Transport for CachedTransport<T> {
    async fn get(&self, url: &Url) -> Result<Response> {
        let Some(ttl) = self.rules.ttl_for(url) else {
            return self.inner.get(url).await;
        };

        let path = self.entry_path(url);
        if let Some(entry) = self.read_entry(&path).await {
            if entry.url == url.as_str() && entry.age() < ttl {
                debug!("Cache hit for {}", url);
                return Ok(entry.response);
            }
            debug!("Cache entry for {} is stale", url);
        }

        let response = self.inner.get(url).await?;
        if response.is_ok() {
            // A document we could not store is still a document
            if let Err(e) = self.write_entry(&path, url, &response).await {
                warn!("Could not cache {}: {}", url, e.chain());
            }
        }

        Ok(response)
    }
}
