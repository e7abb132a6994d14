//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while building the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse settings file '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Validation error in a settings file.
    #[error("Validation error in '{path}': {message}")]
    ValidationError { path: String, message: String },

    /// The start date is not a `YYYY-MM-DD` date.
    #[error("'start-date' flag malformed, must be in YYYY-MM-DD format: {source}")]
    MalformedDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The output format is not one of the supported values.
    #[error("Unsupported format option '{value}', allowed: 'terminal', 'discord'")]
    UnsupportedFormat { value: String },

    /// The release branch is not a valid git branch name.
    #[error("Invalid release branch name '{name}': {message}")]
    InvalidBranchName { name: String, message: String },

    /// No token was given and none could be found.
    #[error("Could not find a GitHub token: pass --token, set GITHUB_TOKEN or create {hint}")]
    MissingToken { hint: String },

    /// The token does not look like a GitHub personal access token.
    #[error("Provided token malformed, must use a valid GitHub personal access token")]
    MalformedToken,
}
