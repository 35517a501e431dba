//! Construction-time error types
//!
//! Request-time failures never surface as errors: they fold into response
//! statuses (404/405/416). The variants here are configuration mistakes and
//! fail fast when a handler is built.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration rejected while building a handler
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Root directory is missing, unreadable, or not a directory
    #[error("root directory {path:?} is not servable: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Header rule pattern failed to compile
    #[error("invalid header rule pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Configured header name or value is not valid HTTP
    #[error("invalid configured header {0:?}")]
    Header(String),
}
