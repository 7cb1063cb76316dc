// src/pager.rs
// =============================================================================
// Displays a document, optionally through the user's pager.
//
// The pager is $PAGER (split on whitespace, so "less -R" works) or `less`.
// When stdout is not a terminal, or the pager cannot be started, the text is
// printed directly instead.
// =============================================================================

use std::io::{self, ErrorKind, IsTerminal, Write};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

const DEFAULT_PAGER: &str = "less";

pub fn show(text: &str, use_pager: bool) {
    if use_pager && io::stdout().is_terminal() {
        let (program, args) = pager_command(std::env::var("PAGER").ok().as_deref());
        match page(&program, &args, text) {
            Ok(()) => return,
            Err(e) => warn!("Could not run pager '{}': {}", program, e),
        }
    }

    println!("{}", text);
}

// Program and arguments to run, from the value of $PAGER
fn pager_command(pager: Option<&str>) -> (String, Vec<String>) {
    let mut words = pager.unwrap_or_default().split_whitespace().map(str::to_string);

    match words.next() {
        Some(program) => (program, words.collect()),
        None => (DEFAULT_PAGER.to_string(), Vec::new()),
    }
}

fn page(program: &str, args: &[String], text: &str) -> io::Result<()> {
    debug!("Paging through {} {:?}", program, args);

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(text.as_bytes()) {
            // The user quit the pager before reading everything
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
            other => other?,
        }
    }

    child.wait()?;
    Ok(())
}
