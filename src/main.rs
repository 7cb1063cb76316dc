// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and build the one HTTP transport everything shares
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = not found / HTTP error, 2 = error)
//
// All requests run one after another on a single-threaded runtime.
// =============================================================================

mod cli;
mod config;
mod error;
mod index;
mod pager;
mod resolve;
mod transport;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use config::Config;
use index::{DocumentIndex, IndexBuilder};
use resolve::{DocumentKind, FetchResult, Resolution, Resolver, SuggestionOptions};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so they never mix with document text on stdout.
// RUST_LOG overrides the level chosen by --verbose.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "rfc_cli=debug" } else { "rfc_cli=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::from_cli(&cli).context("invalid configuration")?;
    let transport = transport::build(&config).context("could not set up the HTTP client")?;
    let index = IndexBuilder::new(transport.as_ref(), &config.endpoints, config.scraper.scraper());

    match cli.command {
        Commands::Show { rfc, pager } => {
            // A draft name given to `show` is shown as a draft
            let kind = DocumentKind::detect(&rfc);
            let resolver = Resolver::new(
                transport.as_ref(),
                &config.endpoints,
                index,
                SuggestionOptions::default(),
            );
            handle_show(&resolver, &rfc, kind, pager).await
        }
        Commands::ShowDraft {
            draft,
            pager,
            limit,
            cutoff,
        } => {
            let options = SuggestionOptions::new(limit, cutoff)?;
            let resolver = Resolver::new(transport.as_ref(), &config.endpoints, index, options);
            handle_show(&resolver, &draft, DocumentKind::Draft, pager).await
        }
        Commands::ListDrafts { json } => {
            let drafts = index
                .list_drafts()
                .await
                .context("could not fetch the drafts listing")?;
            print_index(drafts, json)
        }
        Commands::ListRfcs { json } => {
            let rfcs = index
                .list_rfcs()
                .await
                .context("could not fetch the RFC listing")?;
            print_index(rfcs, json)
        }
    }
}

// Handles `show` and `show-draft`
//
// Prints the document, the HTTP error, or the suggestions for a missing draft.
async fn handle_show(resolver: &Resolver<'_>, id: &str, kind: DocumentKind, pager: bool) -> Result<i32> {
    let resolution = resolver
        .resolve(id, kind)
        .await
        .with_context(|| format!("could not fetch '{}'", id))?;

    let (output, exit_code) = render_resolution(id, resolution);
    match output {
        ShowOutput::Document(body) => pager::show(&body, pager),
        ShowOutput::Message(message) => println!("{}", message),
    }

    Ok(exit_code)
}

/// What `show` prints: the document itself, or a one-off message
#[derive(Debug, PartialEq, Eq)]
enum ShowOutput {
    Document(String),
    Message(String),
}

// Only a found document exits 0
fn render_resolution(id: &str, resolution: Resolution) -> (ShowOutput, i32) {
    match resolution {
        Resolution::Fetched(FetchResult::Found(body)) => (ShowOutput::Document(body), 0),
        Resolution::Fetched(FetchResult::NotFound) => (
            ShowOutput::Message(format!("Error 404: RFC {} not found", id)),
            1,
        ),
        Resolution::Fetched(FetchResult::TransportError(status)) => {
            (ShowOutput::Message(format!("Error {}", status)), 1)
        }
        Resolution::Suggestions { query, suggestions } => {
            let message = if suggestions.is_empty() {
                format!("No draft matching {} found, and no close matches either", query)
            } else {
                let mut lines = vec!["Draft not found, possible matches include:".to_string()];
                lines.extend(suggestions.iter().map(|suggestion| format!("  - {}", suggestion)));
                lines.join("\n")
            };
            (ShowOutput::Message(message), 1)
        }
    }
}

// Prints a scraped index sorted, as lines or as a JSON array
fn print_index(index: DocumentIndex, json: bool) -> Result<i32> {
    let mut names: Vec<String> = index.into_iter().collect();
    names.sort();

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for name in &names {
            println!("{}", name);
        }
    }

    Ok(0)
}
