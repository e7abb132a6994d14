//! Runner error types.

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub API errors that abort a whole stage.
    #[error(transparent)]
    Api(#[from] crate::github::ApiError),

    /// Invalid label requests.
    #[error(transparent)]
    Label(#[from] crate::labels::LabelError),

    /// Writing the listing failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// A stage failed for every item it was given.
    #[error("{stage} failed for {failures} repositories and produced nothing, see logs above")]
    Stage { stage: &'static str, failures: usize },
}
