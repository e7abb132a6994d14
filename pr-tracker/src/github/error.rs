//! GitHub API error types.

use thiserror::Error;

/// Errors returned by a [`GitHubApi`](super::GitHubApi) call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The response could not be interpreted.
    #[error("Unexpected response from {route}: {message}")]
    UnexpectedResponse { route: String, message: String },

    /// The requested resource does not exist.
    #[error("Not found: {resource}")]
    NotFound { resource: String },
}

impl ApiError {
    /// Returns true if GitHub answered with a 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::GitHubError(octocrab::Error::GitHub { source, .. }) => {
                source.status_code.as_u16() == 404
            }
            Self::NotFound { .. } => true,
            _ => false,
        }
    }
}
