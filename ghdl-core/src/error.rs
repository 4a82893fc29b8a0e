//! Error types for ghdl

use thiserror::Error;

/// Result type alias for ghdl core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ghdl core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration or secrets error
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL does not point at a file, directory or repository
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
