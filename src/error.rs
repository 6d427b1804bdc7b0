//! Error types for dexsheet operations.

use thiserror::Error;

/// Errors surfaced by the pipeline and its collaborators.
///
/// Transformation itself never fails on odd input: missing anchors or
/// unmatched rules simply produce fewer blocks. Errors come from compiling
/// a policy, resolving locations, or from the page and image sources.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid selector `{0}`")]
    InvalidSelector(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to fetch {location}: {reason}")]
    Fetch { location: String, reason: String },

    #[error("Worker pool error: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, Error>;
