// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Layout:
//   rfc-cli [--cache | --no-cache] [--cache-dir DIR] [--scraper regex|html]
//           [--rfc-base URL] [--drafts-base URL] [--timeout SECS] [-v]
//           <COMMAND>
//
// Commands: show, show-draft, list-drafts, list-rfcs
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_DRAFTS_BASE, DEFAULT_RFC_BASE};
use crate::resolve::{DEFAULT_CUTOFF, DEFAULT_SUGGESTION_LIMIT};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "rfc-cli",
    version,
    about = "Fetch and read IETF RFCs and Internet-Drafts from the terminal",
    long_about = "rfc-cli downloads RFC and Internet-Draft text from the IETF servers. \
                  When a draft cannot be found it suggests drafts with similar names."
)]
pub struct Cli {
    /// Cache fetched documents on disk
    ///
    /// --cache and --no-cache override each other; the last one wins.
    #[arg(long, global = true, overrides_with = "no_cache")]
    pub cache: bool,

    /// Do not use the on-disk cache (the default)
    #[arg(long = "no-cache", global = true, overrides_with = "cache")]
    pub no_cache: bool,

    /// Directory for cached responses (default: <user cache dir>/rfc-cli)
    #[arg(long, global = true, env = "RFC_CLI_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Base URL RFC text files are served from
    #[arg(long, global = true, env = "RFC_CLI_RFC_BASE", default_value = DEFAULT_RFC_BASE)]
    pub rfc_base: String,

    /// Base URL Internet-Draft text files are served from
    #[arg(long, global = true, env = "RFC_CLI_DRAFTS_BASE", default_value = DEFAULT_DRAFTS_BASE)]
    pub drafts_base: String,

    /// How directory listings are scraped for document names
    #[arg(long, global = true, value_enum, default_value_t = ScraperKind::Regex)]
    pub scraper: ScraperKind,

    /// Request timeout in seconds (no timeout when omitted)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether the response cache was switched on
    pub fn cache_enabled(&self) -> bool {
        self.cache && !self.no_cache
    }
}

/// Which listing scraper the index builder uses
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScraperKind {
    /// Pattern match over the raw markup
    Regex,
    /// Parse the markup into a DOM and select anchors
    Html,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show an RFC by number
    ///
    /// Example: rfc-cli show 8259
    Show {
        /// The RFC number (a name starting with "draft-" is shown as a draft)
        rfc: String,

        /// Display the document through $PAGER
        #[arg(long)]
        pager: bool,
    },

    /// Show an Internet-Draft by name
    ///
    /// Example: rfc-cli show-draft ietf-httpbis-semantics
    ShowDraft {
        /// The draft name, with or without the "draft-" prefix
        draft: String,

        /// Display the document through $PAGER
        #[arg(long)]
        pager: bool,

        /// Maximum number of suggestions when the draft is not found
        #[arg(long, default_value_t = DEFAULT_SUGGESTION_LIMIT)]
        limit: usize,

        /// Minimum similarity (0.0 to 1.0) for a suggestion
        #[arg(long, default_value_t = DEFAULT_CUTOFF)]
        cutoff: f64,
    },

    /// List the Internet-Drafts currently published
    ListDrafts {
        /// Output a JSON array instead of one name per line
        #[arg(long)]
        json: bool,
    },

    /// List the entries of the RFC directory
    ListRfcs {
        /// Output a JSON array instead of one name per line
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_defaults_to_off() {
        let cli = Cli::parse_from(["rfc-cli", "show", "8259"]);
        assert!(!cli.cache_enabled());
    }

    #[test]
    fn test_last_cache_flag_wins() {
        let cli = Cli::parse_from(["rfc-cli", "--no-cache", "--cache", "show", "8259"]);
        assert!(cli.cache_enabled());

        let cli = Cli::parse_from(["rfc-cli", "--cache", "--no-cache", "show", "8259"]);
        assert!(!cli.cache_enabled());
    }

    #[test]
    fn test_show_draft_defaults() {
        let cli = Cli::parse_from(["rfc-cli", "show-draft", "ietf-foo", "--pager"]);
        match cli.command {
            Commands::ShowDraft { draft, pager, limit, cutoff } => {
                assert_eq!(draft, "ietf-foo");
                assert!(pager);
                assert_eq!(limit, 3);
                assert_eq!(cutoff, 0.6);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_scraper_flag() {
        let cli = Cli::parse_from(["rfc-cli", "--scraper", "html", "list-drafts"]);
        assert_eq!(cli.scraper, ScraperKind::Html);
    }
}
