//! Error types for the trawl engine.
//!
//! All fallible engine operations use the [`TrawlError`] enum. Errors are
//! caught at the search-session boundary and surfaced through the engine's
//! `error` state accessor; they never unwind across the public API.

use thiserror::Error;

/// The main error type for engine operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrawlError {
    /// The remote fetch adapter rejected or threw.
    #[error("remote fetch error: {0}")]
    RemoteFetch(String),

    /// A record could not be resolved or scored during match evaluation.
    #[error("match evaluation error: {0}")]
    MatchEvaluation(String),
}

/// Result type alias for operations that may fail with [`TrawlError`].
pub type Result<T> = std::result::Result<T, TrawlError>;

impl TrawlError {
    /// Create a new remote fetch error.
    pub fn remote_fetch<S: Into<String>>(msg: S) -> Self {
        TrawlError::RemoteFetch(msg.into())
    }

    /// Create a new match evaluation error.
    pub fn match_evaluation<S: Into<String>>(msg: S) -> Self {
        TrawlError::MatchEvaluation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = TrawlError::remote_fetch("connection refused");
        assert_eq!(error.to_string(), "remote fetch error: connection refused");

        let error = TrawlError::match_evaluation("resolver panicked");
        assert_eq!(
            error.to_string(),
            "match evaluation error: resolver panicked"
        );
    }

    #[test]
    fn test_error_clone_and_eq() {
        let error = TrawlError::remote_fetch("timeout");
        assert_eq!(error.clone(), error);
        assert_ne!(error, TrawlError::match_evaluation("timeout"));
    }
}
