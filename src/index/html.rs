// src/index/html.rs
// =============================================================================
// Listing scraper that parses the markup instead of pattern matching it.
//
// Drafts come from the text of every `a[href]`; RFC entries only from
// anchors sitting directly inside an `<li>`, as on the rfc-editor listing.
//
// Unlike the regex scraper this one does not care about attribute order,
// quoting style or line breaks inside the anchor.
// =============================================================================

use scraper::{ElementRef, Html, Selector};

use super::{DocumentIndex, ListingScraper, DRAFT_PREFIX};

pub struct HtmlScraper;

impl ListingScraper for HtmlScraper {
    fn drafts(&self, markup: &str) -> DocumentIndex {
        anchor_texts(markup, "a[href]")
            .iter()
            .filter_map(|text| draft_name(text).map(str::to_string))
            .collect()
    }

    fn rfcs(&self, markup: &str) -> DocumentIndex {
        anchor_texts(markup, "li > a[href]")
            .into_iter()
            .filter(|text| !text.is_empty())
            .collect()
    }
}

// Trimmed text of every element matching `css`
fn anchor_texts(markup: &str, css: &str) -> Vec<String> {
    let document = Html::parse_document(markup);

    // Our selectors are constants and known to be valid
    let selector = Selector::parse(css).expect("valid CSS selector");

    document
        .select(&selector)
        .map(|element: ElementRef| element.text().collect::<String>().trim().to_string())
        .collect()
}

// "draft-ietf-foo-01.txt" -> Some("draft-ietf-foo-01")
//
// The name is the longest run of [a-zA-Z0-9-] after the prefix, and it must be
// followed by a non-empty extension made of '.' and word characters.
fn draft_name(text: &str) -> Option<&str> {
    if !text.starts_with(DRAFT_PREFIX) {
        return None;
    }

    let end = text
        .char_indices()
        .skip(DRAFT_PREFIX.len())
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '-'))
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    let (name, extension) = text.split_at(end);
    let is_extension = !extension.is_empty()
        && extension
            .chars()
            .all(|c| c == '.' || c == '_' || c.is_alphanumeric());

    if name.len() > DRAFT_PREFIX.len() && is_extension {
        Some(name)
    } else {
        None
    }
}
