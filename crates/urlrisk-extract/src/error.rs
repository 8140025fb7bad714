use std::time::Duration;
use thiserror::Error;

/// Failure of a network-backed lookup.
///
/// These never reach the caller of the assembler; they become the
/// fallback reason of the affected feature group.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("domain {domain} is not registered")]
    NotRegistered { domain: String },

    #[error("malformed registration record for {domain}: {reason}")]
    MalformedRecord { domain: String, reason: String },

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("exceeded {max} redirects fetching {url}")]
    TooManyRedirects { url: String, max: usize },

    #[error("traffic rank unavailable: {0}")]
    RankUnavailable(String),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
