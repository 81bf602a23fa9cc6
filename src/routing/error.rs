//! Routing errors.

use thiserror::Error;

use crate::views::ViewLoadError;

/// The route table could not be built. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("duplicate route name `{0}`")]
    DuplicateName(String),

    #[error("duplicate route path `{path}` (routes `{first}` and `{second}`)")]
    DuplicatePath {
        path: String,
        first: String,
        second: String,
    },

    #[error("invalid path pattern `{pattern}`: {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },
}

/// A navigation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No registered route matches the path.
    #[error("no route matches `{path}`")]
    NotFound { path: String },

    /// The route matched but its deferred view failed to load.
    #[error(transparent)]
    ViewLoad(#[from] ViewLoadError),
}

impl ResolveError {
    /// Whether repeating the same navigation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ResolveError::ViewLoad(_))
    }
}
