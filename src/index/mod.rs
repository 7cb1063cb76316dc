// src/index/mod.rs
// =============================================================================
// The index builder: which documents exist upstream?
//
// Both IETF document directories serve a plain HTML listing. We GET the
// listing and pull the document names out of the anchors.
//
// Submodules:
// - pattern: scrapes with regular expressions over the raw markup (default)
// - html: parses the markup into a DOM and selects anchors with CSS
//
// Scrapers only see markup, never the network, so they can be swapped
// without touching the resolver. If the upstream page layout drifts, a
// scraper returns an empty set rather than failing.
// =============================================================================

mod html;
mod pattern;

pub use html::HtmlScraper;
pub use pattern::RegexScraper;

use std::collections::HashSet;

use tracing::{debug, warn};
use url::Url;

use crate::cli::ScraperKind;
use crate::config::Endpoints;
use crate::error::Result;
use crate::transport::Transport;

/// Every Internet-Draft name starts with this
pub const DRAFT_PREFIX: &str = "draft-";

/// Set of document identifiers scraped from one listing page
pub type DocumentIndex = HashSet<String>;

/// Extracts document names from listing markup.
pub trait ListingScraper {
    /// Draft names (`draft-...`, without file extension)
    fn drafts(&self, markup: &str) -> DocumentIndex;

    /// Raw entry names of the RFC directory (`rfc8259.txt`, `inline-errata/`...)
    fn rfcs(&self, markup: &str) -> DocumentIndex;
}

impl ScraperKind {
    pub fn scraper(self) -> Box<dyn ListingScraper> {
        match self {
            ScraperKind::Regex => Box::new(RegexScraper),
            ScraperKind::Html => Box::new(HtmlScraper),
        }
    }
}

pub struct IndexBuilder<'a> {
    transport: &'a dyn Transport,
    endpoints: &'a Endpoints,
    scraper: Box<dyn ListingScraper>,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        endpoints: &'a Endpoints,
        scraper: Box<dyn ListingScraper>,
    ) -> Self {
        Self {
            transport,
            endpoints,
            scraper,
        }
    }

    /// Every draft name on the drafts listing page
    pub async fn list_drafts(&self) -> Result<DocumentIndex> {
        let markup = self.fetch_listing(self.endpoints.drafts_listing()).await?;
        let drafts = self.scraper.drafts(&markup);

        debug!("Found {} drafts", drafts.len());
        Ok(drafts)
    }

    /// Every file entry on the RFC listing page
    pub async fn list_rfcs(&self) -> Result<DocumentIndex> {
        let markup = self.fetch_listing(self.endpoints.rfc_listing()).await?;

        // The listing mixes files and folders; folders end in '/'
        let rfcs: DocumentIndex = self
            .scraper
            .rfcs(&markup)
            .into_iter()
            .filter(|entry| !entry.ends_with('/'))
            .collect();

        debug!("Found {} RFC entries", rfcs.len());
        Ok(rfcs)
    }

    async fn fetch_listing(&self, url: &Url) -> Result<String> {
        let response = self.transport.get(url).await?;
        if !response.is_ok() {
            warn!("Listing {} answered HTTP {}", url, response.status);
        }
        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;

    const DRAFTS: &str = "https://www.ietf.org/id/";
    const RFCS: &str = "https://www.rfc-editor.org/rfc/";

    const DRAFT_LISTING: &str = r#"
<html><body><ul>
<a href="draft-ietf-foo-01.txt">draft-ietf-foo-01.txt</a>
<a href="draft-ietf-foo-01.html">draft-ietf-foo-01.html</a>
<a href="draft-ietf-bar-03.txt">draft-ietf-bar-03.txt</a>
<a href="draft-ietf-bar-03.txt">draft-ietf-bar-03.txt</a>
<a href="../">Parent Directory</a>
</ul></body></html>
"#;

    const RFC_LISTING: &str = r#"
<ul>
<li><a href="rfc8259.txt"> rfc8259.txt</a></li>
<li><a href="rfc8259/">rfc8259/</a></li>
<li><a href="rfc9110.txt">rfc9110.txt</a></li>
<li><a href="inline-errata/">inline-errata/</a></li>
</ul>
"#;

    fn set(items: &[&str]) -> DocumentIndex {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_list_drafts_deduplicates() {
        let endpoints = Endpoints::ietf().unwrap();
        let transport = MockTransport::new().with(DRAFTS, 200, DRAFT_LISTING);

        for kind in [ScraperKind::Regex, ScraperKind::Html] {
            let builder = IndexBuilder::new(&transport, &endpoints, kind.scraper());
            let drafts = builder.list_drafts().await.unwrap();
            assert_eq!(drafts, set(&["draft-ietf-foo-01", "draft-ietf-bar-03"]));
        }
    }

    #[tokio::test]
    async fn test_list_rfcs_drops_directories() {
        let endpoints = Endpoints::ietf().unwrap();
        let transport = MockTransport::new().with(RFCS, 200, RFC_LISTING);

        for kind in [ScraperKind::Regex, ScraperKind::Html] {
            let builder = IndexBuilder::new(&transport, &endpoints, kind.scraper());
            let rfcs = builder.list_rfcs().await.unwrap();
            assert_eq!(rfcs, set(&["rfc8259.txt", "rfc9110.txt"]));
        }
    }

    #[tokio::test]
    async fn test_unexpected_markup_gives_empty_index() {
        let endpoints = Endpoints::ietf().unwrap();
        let transport = MockTransport::new().with(DRAFTS, 200, "<p>maintenance</p>");
        let builder = IndexBuilder::new(&transport, &endpoints, ScraperKind::Regex.scraper());

        assert!(builder.list_drafts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_listing_gives_empty_index() {
        let endpoints = Endpoints::ietf().unwrap();
        let transport = MockTransport::new();
        let builder = IndexBuilder::new(&transport, &endpoints, ScraperKind::Regex.scraper());

        assert!(builder.list_rfcs().await.unwrap().is_empty());
        assert_eq!(transport.requests(), vec![RFCS.to_string()]);
    }
}
