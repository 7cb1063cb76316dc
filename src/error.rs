// src/error.rs
// =============================================================================
// Error types shared by the transport, index and resolve modules.
//
// Expected HTTP outcomes (200, 404, 5xx...) are NOT errors here. They are
// data, carried by `Response` and `FetchResult`. This enum only covers the
// cases where we could not get an answer at all, or could not store one.
//
// Messages never repeat their cause: it is reachable through source(), and
// main.rs prints the whole chain with {:#}.
//
// main.rs wraps these in anyhow::Error, so the binary keeps using `?` with
// added context while the library-ish modules keep a precise type.
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP client could not be constructed (bad TLS setup, etc.)
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response (DNS, connection reset, timeout)
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A document name could not be joined onto a base URL
    #[error("invalid URL '{input}'")]
    Url {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("cache I/O error at {}", path.display())]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode cache entry for {url}")]
    CacheEncode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid suggestion settings: {0}")]
    InvalidSuggestionOptions(String),
}

impl Error {
    /// The message followed by every cause, for log lines that have no
    /// anyhow chain to print it
    pub fn chain(&self) -> String {
        let mut text = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(source) = cause {
            text.push_str(": ");
            text.push_str(&source.to_string());
            cause = source.source();
        }
        text
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_cause_is_not_repeated() {
        let error = Error::CacheIo {
            path: PathBuf::from("/tmp/cache"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "Not a directory"),
        };
        assert_eq!(error.to_string(), "cache I/O error at /tmp/cache");
        assert_eq!(error.source().unwrap().to_string(), "Not a directory");

        assert_eq!(error.chain(), "cache I/O error at /tmp/cache: Not a directory");

        let chain = format!("{:#}", anyhow::Error::new(error));
        assert_eq!(chain.matches("Not a directory").count(), 1);
    }

    #[test]
    fn test_url_error_message() {
        let source = url::Url::parse("not a url").unwrap_err();
        let error = Error::Url {
            input: "not a url".to_string(),
            source,
        };
        assert_eq!(error.to_string(), "invalid URL 'not a url'");
        assert!(error.source().is_some());
    }
}
