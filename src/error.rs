//! Query Engine Error Types
//!
//! Two failure classes reach callers:
//! - [`QueryError::UnmappedFilter`] is raised while decomposing a filter set,
//!   before any request leaves the process.
//! - [`RetrievalError`] is raised by a page or count fetch and aborts the
//!   whole session. There is no internal retry.
//!
//! Running out of time or hitting `max_results` are not errors; see
//! [`crate::execution::SessionState`].

use thiserror::Error;

/// Errors surfaced by a query session
#[derive(Error, Debug)]
pub enum QueryError {
    /// A filter has no backend field mapping
    #[error("No field mapping for filter '{filter}'")]
    UnmappedFilter { filter: String },

    /// A catalog request failed
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
}

/// Failures fetching a page (or a count) from the remote catalog
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Network failure, request timeout, or unreadable response body
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Catalog answered with a non-success status
    #[error("Catalog returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected page shape
    #[error("Malformed catalog page: {0}")]
    MalformedPage(String),
}

/// Failures writing a session's records to an output sink
#[derive(Error, Debug)]
pub enum OutputError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write record: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for session-level operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type for catalog requests
pub type RetrievalResult<T> = Result<T, RetrievalError>;
