// src/resolve/mod.rs
// =============================================================================
// The resolver: turns what the user typed into a document, or into a list of
// "did you mean" suggestions.
//
// Steps:
// 1. Normalize the identifier (drafts always carry the "draft-" prefix)
// 2. GET the canonical URL for it
// 3. 200 -> the document text
// 4. 404 on a draft -> fetch the drafts index and fuzzy-match against it
// 5. 404 on an RFC -> not found (RFC numbers have no name index to match)
// 6. anything else -> the status code, verbatim
//
// None of these outcomes is an Err. Err is reserved for requests that got no
// response at all (see error.rs).
//
// Submodules:
// - matching: the similarity ratio and close_matches
// =============================================================================

mod matching;

use matching::close_matches;

use tracing::{debug, info};

use crate::config::Endpoints;
use crate::error::{Error, Result};
use crate::index::{IndexBuilder, DRAFT_PREFIX};
use crate::transport::{Response, Transport};

/// How many suggestions to show by default
pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

/// Minimum similarity ratio for a suggestion
pub const DEFAULT_CUTOFF: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Rfc,
    Draft,
}

impl DocumentKind {
    /// Names starting with "draft-" are drafts, anything else an RFC number
    pub fn detect(id: &str) -> Self {
        if id.starts_with(DRAFT_PREFIX) {
            DocumentKind::Draft
        } else {
            DocumentKind::Rfc
        }
    }
}

/// Outcome of a direct fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Found(String),
    NotFound,
    /// Any status other than 200 and 404
    TransportError(u16),
}

impl From<Response> for FetchResult {
    fn from(response: Response) -> Self {
        if response.is_ok() {
            FetchResult::Found(response.body)
        } else if response.is_not_found() {
            FetchResult::NotFound
        } else {
            FetchResult::TransportError(response.status)
        }
    }
}

/// Candidate names, most similar first, "draft-" prefix stripped
pub type SuggestionList = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Fetched(FetchResult),
    /// The draft does not exist; `suggestions` may be empty
    Suggestions {
        query: String,
        suggestions: SuggestionList,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestionOptions {
    limit: usize,
    cutoff: f64,
}

impl SuggestionOptions {
    /// `limit` must be positive and `cutoff` within 0.0..=1.0
    pub fn new(limit: usize, cutoff: f64) -> Result<Self> {
        if limit == 0 {
            return Err(Error::InvalidSuggestionOptions(
                "limit must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&cutoff) {
            return Err(Error::InvalidSuggestionOptions(format!(
                "cutoff must be between 0.0 and 1.0, got {}",
                cutoff
            )));
        }

        Ok(Self { limit, cutoff })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

impl Default for SuggestionOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SUGGESTION_LIMIT,
            cutoff: DEFAULT_CUTOFF,
        }
    }
}

/// Prepends "draft-" unless already present. Never validates the rest, so
/// an empty id becomes "draft-".
pub fn normalize_draft(id: &str) -> String {
    if id.starts_with(DRAFT_PREFIX) {
        id.to_string()
    } else {
        format!("{}{}", DRAFT_PREFIX, id)
    }
}

/// "draft-ietf-foo" -> "ietf-foo"
pub fn display_name(id: &str) -> &str {
    id.strip_prefix(DRAFT_PREFIX).unwrap_or(id)
}

pub struct Resolver<'a> {
    transport: &'a dyn Transport,
    endpoints: &'a Endpoints,
    index: IndexBuilder<'a>,
    options: SuggestionOptions,
}

impl<'a> Resolver<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        endpoints: &'a Endpoints,
        index: IndexBuilder<'a>,
        options: SuggestionOptions,
    ) -> Self {
        Self {
            transport,
            endpoints,
            index,
            options,
        }
    }

    pub async fn resolve(&self, id: &str, kind: DocumentKind) -> Result<Resolution> {
        let (id, url) = match kind {
            DocumentKind::Rfc => (id.to_string(), self.endpoints.rfc_url(id)?),
            DocumentKind::Draft => {
                let name = normalize_draft(id);
                let url = self.endpoints.draft_url(&name)?;
                (name, url)
            }
        };

        let result = FetchResult::from(self.transport.get(&url).await?);
        debug!("{} resolved to {:?}", url, DebugOutcome(&result));

        match (result, kind) {
            (FetchResult::NotFound, DocumentKind::Draft) => {
                info!("{} not found, looking for similar drafts", id);
                let suggestions = self.suggest(&id).await?;
                Ok(Resolution::Suggestions {
                    query: id,
                    suggestions,
                })
            }
            (result, _) => Ok(Resolution::Fetched(result)),
        }
    }

    async fn suggest(&self, name: &str) -> Result<SuggestionList> {
        let index = self.index.list_drafts().await?;

        Ok(close_matches(name, &index, self.options.limit(), self.options.cutoff())
            .iter()
            .map(|candidate| display_name(candidate).to_string())
            .collect())
    }
}

// Keeps document bodies out of debug logs
struct DebugOutcome<'r>(&'r FetchResult);

impl std::fmt::Debug for DebugOutcome<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            FetchResult::Found(body) => write!(f, "Found({} bytes)", body.len()),
            FetchResult::NotFound => write!(f, "NotFound"),
            FetchResult::TransportError(status) => write!(f, "TransportError({})", status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ScraperKind;
    use crate::transport::mock::MockTransport;

    const DRAFTS: &str = "https://www.ietf.org/id/";

    fn listing(names: &[&str]) -> String {
        names
            .iter()
            .map(|name| format!("<a href=\"{0}.txt\">{0}.txt</a>\n", name))
            .collect()
    }

    async fn resolve(transport: &MockTransport, id: &str, kind: DocumentKind) -> Resolution {
        let endpoints = Endpoints::ietf().unwrap();
        let index = IndexBuilder::new(transport, &endpoints, ScraperKind::Regex.scraper());
        let resolver = Resolver::new(transport, &endpoints, index, SuggestionOptions::default());
        resolver.resolve(id, kind).await.unwrap()
    }

    #[test]
    fn test_normalize_keeps_prefixed_names() {
        for id in ["draft-ietf-foo-bar", "draft-", "draft-draft-x"] {
            assert_eq!(normalize_draft(id), id);
        }
    }

    #[test]
    fn test_normalize_adds_prefix_once() {
        for id in ["ietf-foo-bar", "", "Draft-x", " draft-x"] {
            let once = normalize_draft(id);
            assert_eq!(once, format!("draft-{}", id));
            assert_eq!(normalize_draft(&once), once);
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("draft-ietf-foo"), "ietf-foo");
        assert_eq!(display_name("rfc1.txt"), "rfc1.txt");
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(DocumentKind::detect("8259"), DocumentKind::Rfc);
        assert_eq!(DocumentKind::detect("draft-ietf-foo"), DocumentKind::Draft);
    }

    #[test]
    fn test_suggestion_options() {
        assert!(SuggestionOptions::new(0, 0.6).is_err());
        assert!(SuggestionOptions::new(3, 1.5).is_err());
        assert!(SuggestionOptions::new(3, -0.1).is_err());
        let options = SuggestionOptions::new(5, 0.0).unwrap();
        assert_eq!((options.limit(), options.cutoff()), (5, 0.0));
    }

    #[tokio::test]
    async fn test_rfc_found() {
        let transport = MockTransport::new().with("https://www.rfc-editor.org/rfc/rfc8259.txt", 200, "JSON");
        let resolution = resolve(&transport, "8259", DocumentKind::Rfc).await;
        assert_eq!(resolution, Resolution::Fetched(FetchResult::Found("JSON".to_string())));
    }

    #[tokio::test]
    async fn test_rfc_not_found_skips_suggestions() {
        let transport = MockTransport::new().with(DRAFTS, 200, &listing(&["draft-ietf-foo-01"]));
        let resolution = resolve(&transport, "99999", DocumentKind::Rfc).await;

        assert_eq!(resolution, Resolution::Fetched(FetchResult::NotFound));
        assert_eq!(
            transport.requests(),
            vec!["https://www.rfc-editor.org/rfc/rfc99999.txt".to_string()]
        );
    }

    #[tokio::test]
    async fn test_draft_found_without_prefix() {
        let transport = MockTransport::new().with("https://www.ietf.org/id/draft-ietf-foo-01.txt", 200, "text");
        let resolution = resolve(&transport, "ietf-foo-01", DocumentKind::Draft).await;
        assert_eq!(resolution, Resolution::Fetched(FetchResult::Found("text".to_string())));
    }

    #[tokio::test]
    async fn test_draft_not_found_suggests_nearest_first() {
        let transport = MockTransport::new().with(
            DRAFTS,
            200,
            &listing(&["draft-ietf-bar-01", "draft-ietf-foo-01", "draft-irtf-unrelated-thing-99"]),
        );
        let resolution = resolve(&transport, "ietf-fop-01", DocumentKind::Draft).await;

        assert_eq!(
            resolution,
            Resolution::Suggestions {
                query: "draft-ietf-fop-01".to_string(),
                suggestions: vec!["ietf-foo-01".to_string(), "ietf-bar-01".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_empty_index_gives_no_suggestions() {
        let transport = MockTransport::new().with(DRAFTS, 200, "<html></html>");
        let resolution = resolve(&transport, "draft-ietf-fop-01", DocumentKind::Draft).await;

        assert_eq!(
            resolution,
            Resolution::Suggestions {
                query: "draft-ietf-fop-01".to_string(),
                suggestions: Vec::new(),
            }
        );
    }

    #[tokio::test]
    async fn test_other_status_is_reported() {
        let transport = MockTransport::new().with("https://www.ietf.org/id/draft-x.txt", 503, "busy");
        let resolution = resolve(&transport, "x", DocumentKind::Draft).await;

        assert_eq!(resolution, Resolution::Fetched(FetchResult::TransportError(503)));
        assert_eq!(transport.requests().len(), 1);
    }
}
