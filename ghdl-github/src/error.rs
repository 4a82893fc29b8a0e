//! Error types for GitHub operations
//!
//! The probe, the tree listing, both content strategies and the single-file
//! download all report failures through this one enum. Every error ends the
//! current download; nothing is retried.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or downloading a target
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP 401: a token was sent and GitHub rejected it
    #[error("Invalid GitHub token")]
    InvalidToken,

    /// HTTP 403
    #[error("GitHub rate limit exceeded{}", reset_suffix(.reset_at))]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    /// HTTP 404 with a token
    #[error("Not found: {context}")]
    NotFound { context: String },

    /// HTTP 404 without a token; the repository may be private
    #[error("Not found: {context} (it may be a private repository; set GITHUB_TOKEN)")]
    NotFoundOrPrivate { context: String },

    /// Any other non-success status from an API endpoint
    #[error("GitHub API error: HTTP {status} | {context}")]
    UnknownApiError { status: u16, context: String },

    /// URL is not a file, directory or repository URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// One file of a directory download failed
    #[error("Failed to fetch {path}: HTTP {status}")]
    FetchFailed { path: String, status: u16 },

    /// The tree listing was cut short by GitHub
    #[error("Tree listing for {owner}/{repo}@{branch} is truncated; no partial archive is built")]
    IncompleteListing {
        owner: String,
        repo: String,
        branch: String,
    },

    /// Network or protocol failure before a status was received
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// File content could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Zip archive could not be written
    #[error("Archive error: {0}")]
    Archive(String),

    /// Unexpected response shape or unusable endpoint URL
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error from ghdl-core
    #[error("{0}")]
    Core(ghdl_core::Error),
}

fn reset_suffix(reset_at: &Option<DateTime<Utc>>) -> String {
    match reset_at {
        Some(at) => format!(", resets at {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => String::new(),
    }
}

impl From<ghdl_core::Error> for Error {
    fn from(err: ghdl_core::Error) -> Self {
        match err {
            ghdl_core::Error::InvalidUrl(msg) => Error::InvalidUrl(msg),
            other => Error::Core(other),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Archive(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rate_limited_message() {
        let err = Error::RateLimited { reset_at: None };
        assert_eq!(err.to_string(), "GitHub rate limit exceeded");

        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let err = Error::RateLimited { reset_at: Some(at) };
        assert_eq!(
            err.to_string(),
            "GitHub rate limit exceeded, resets at 2023-11-14 22:13:20 UTC"
        );
    }

    #[test]
    fn test_core_invalid_url_maps_to_invalid_url() {
        let err: Error = ghdl_core::Error::InvalidUrl("nope".to_string()).into();
        assert!(matches!(err, Error::InvalidUrl(ref m) if m == "nope"));

        let err: Error = ghdl_core::Error::Config("bad".to_string()).into();
        assert!(matches!(err, Error::Core(_)));
    }
}
