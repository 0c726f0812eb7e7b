//! Error types surfaced by the engine.

use thiserror::Error;

/// Error type for search provider failures.
///
/// Providers produce these when a lookup fails (network error, backend
/// rejection). The session stores the most recent failure so hosts can
/// render an error row in the suggestion list.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SearchError {
    /// Error message.
    pub message: String,
}

impl SearchError {
    /// Create a new search error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for SearchError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for SearchError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_error_from_str() {
        let err = SearchError::from("backend unreachable");
        assert_eq!(err.to_string(), "backend unreachable");
    }
}
