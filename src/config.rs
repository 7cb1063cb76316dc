// src/config.rs
// =============================================================================
// Runtime configuration, built once from the parsed command line.
//
// Everything the fetch layer needs is resolved here: the two base URLs, whether
// the response cache is on (and where it lives), the scraper flavour and the
// request timeout. main.rs builds exactly one transport from this and hands it
// to the index builder and resolver.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::cli::{Cli, ScraperKind};
use crate::error::{Error, Result};

pub const DEFAULT_RFC_BASE: &str = "https://www.rfc-editor.org/rfc/";
pub const DEFAULT_DRAFTS_BASE: &str = "https://www.ietf.org/id/";

/// Sent with every request
pub const USER_AGENT: &str = concat!("rfc-cli/", env!("CARGO_PKG_VERSION"));

/// The two directories documents are served from.
///
/// Both bases always end in `/`, so joining a file name appends to the path
/// instead of replacing its last segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    rfc_base: Url,
    drafts_base: Url,
}

impl Endpoints {
    pub fn new(rfc_base: &str, drafts_base: &str) -> Result<Self> {
        Ok(Self {
            rfc_base: parse_base(rfc_base)?,
            drafts_base: parse_base(drafts_base)?,
        })
    }

    /// The IETF servers
    #[cfg(test)]
    pub fn ietf() -> Result<Self> {
        Self::new(DEFAULT_RFC_BASE, DEFAULT_DRAFTS_BASE)
    }

    /// Directory listing of the RFC base
    pub fn rfc_listing(&self) -> &Url {
        &self.rfc_base
    }

    /// Directory listing of the drafts base
    pub fn drafts_listing(&self) -> &Url {
        &self.drafts_base
    }

    /// `{RFC_BASE}/rfc{number}.txt`
    pub fn rfc_url(&self, number: &str) -> Result<Url> {
        join(&self.rfc_base, &format!("rfc{}.txt", number))
    }

    /// `{DRAFTS_BASE}/{name}.txt`
    pub fn draft_url(&self, name: &str) -> Result<Url> {
        join(&self.drafts_base, &format!("{}.txt", name))
    }
}

fn parse_base(input: &str) -> Result<Url> {
    let mut base = input.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }

    Url::parse(&base).map_err(|source| Error::Url {
        input: input.to_string(),
        source,
    })
}

fn join(base: &Url, file: &str) -> Result<Url> {
    // "./" keeps a colon in the file name from being read as a URL scheme
    base.join(&format!("./{}", file)).map_err(|source| Error::Url {
        input: file.to_string(),
        source,
    })
}

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoints: Endpoints,
    /// Cache directory, `None` when caching is off
    pub cache_dir: Option<PathBuf>,
    pub scraper: ScraperKind,
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let endpoints = Endpoints::new(&cli.rfc_base, &cli.drafts_base)?;

        let cache_dir = if cli.cache_enabled() {
            Some(cli.cache_dir.clone().unwrap_or_else(default_cache_dir))
        } else {
            None
        };

        Ok(Self {
            endpoints,
            cache_dir,
            scraper: cli.scraper,
            timeout: cli.timeout.map(Duration::from_secs),
            user_agent: USER_AGENT.to_string(),
        })
    }
}

fn default_cache_dir() -> PathBuf {
    match dirs::cache_dir() {
        Some(dir) => dir.join("rfc-cli"),
        None => {
            let fallback = std::env::temp_dir().join("rfc-cli");
            warn!(
                "No user cache directory found, caching in {}",
                fallback.display()
            );
            fallback
        }
    }
}
