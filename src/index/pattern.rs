// src/index/pattern.rs
// =============================================================================
// Listing scraper based on regular expressions.
//
// The patterns tolerate anything inside the anchor's href but anchor strictly
// on the shape of the link text:
//   drafts: <a href="...">draft-name.ext</a>        -> "draft-name"
//   rfcs:   <li><a href="..."> entry</a></li>       -> "entry"
//
// `.` never matches a newline, so each match stays on one line of markup.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;

use super::{DocumentIndex, ListingScraper};

// The name stops at the first character outside [a-zA-Z0-9-]; at least one
// extension character must follow before </a>
static DRAFT_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a href=".+?">(draft-[a-zA-Z0-9-]+)[\.\w]+?</a>"#).expect("valid draft pattern")
});

static RFC_LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<li><a href=".+">\s*([^<]+?)</a></li>"#).expect("valid rfc pattern")
});

pub struct RegexScraper;

impl ListingScraper for RegexScraper {
    fn drafts(&self, markup: &str) -> DocumentIndex {
        captures(&DRAFT_ANCHOR, markup)
    }

    fn rfcs(&self, markup: &str) -> DocumentIndex {
        captures(&RFC_LIST_ITEM, markup)
    }
}

// First capture group of every match, deduplicated
fn captures(pattern: &Regex, markup: &str) -> DocumentIndex {
    pattern
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
