//! Error types for fh-hist

use thiserror::Error;

/// Histogram error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid construction input (edges, shapes, ranges)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Two histograms combined bin-by-bin do not share the same edges
    #[error("Bin edge mismatch: {0}")]
    EdgeMismatch(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
