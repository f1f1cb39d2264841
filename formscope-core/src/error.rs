//! Error types for formscope-core

use thiserror::Error;

/// Main error type for the formscope-core library
///
/// Analytics computations themselves never fail: malformed or missing record
/// data degrades to zero/absent results. Errors here come from the edges
/// only, i.e. loading input collections and parsing configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for formscope-core
pub type Result<T> = std::result::Result<T, Error>;
