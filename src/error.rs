//! Error taxonomy for the extraction core and the orchestration layer.

use thiserror::Error;

/// Errors raised by `devlens` library operations.
///
/// Pattern misses inside the extractors are never reported here: an
/// unmatched line is simply skipped.
#[derive(Debug, Error)]
pub enum LensError {
    /// A tree listing entry is missing a required field.
    #[error("malformed tree entry at index {index}: {reason}")]
    MalformedEntry {
        /// Position of the offending entry in the listing.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The input handed to an extractor is not usable text.
    #[error("invalid input for {component}: {reason}")]
    InvalidInput {
        /// Component that rejected the input (`hierarchy`, `schema`, `outline`).
        component: &'static str,
        /// Why the input was rejected.
        reason: String,
    },

    /// The repository URL does not name a GitHub owner and repository.
    #[error("invalid GitHub repository URL: {0}")]
    InvalidRepoUrl(String),

    /// No node with the given path exists in the tree.
    #[error("no node at path {0}")]
    UnknownNode(String),

    /// The node exists but cannot be expanded into an outline.
    #[error("node at path {0} is not a file")]
    NotAFile(String),

    /// The repository host port failed.
    #[error("repository host error: {0}")]
    Host(String),

    /// The LLM port failed.
    #[error("LLM error: {0}")]
    Llm(String),

    /// The LLM returned no text.
    #[error("empty response from LLM")]
    EmptyResponse,

    /// The LLM reply could not be decoded into the expected document.
    #[error("malformed LLM response: {0}")]
    MalformedResponse(String),

    /// The project store failed to read or write a document.
    #[error("project store error: {0}")]
    Store(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, LensError>;

impl LensError {
    /// Builds an [`LensError::InvalidInput`] for non-UTF-8 bytes.
    pub(crate) fn not_utf8(component: &'static str, err: &std::str::Utf8Error) -> Self {
        Self::InvalidInput { component, reason: format!("input is not UTF-8 text ({err})") }
    }
}
