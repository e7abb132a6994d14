//! Label request error types.

use thiserror::Error;

/// Errors in a label request, detected before any remote call.
#[derive(Debug, Error)]
pub enum LabelError {
    /// `--update-only` needs the label to update.
    #[error("Could not update labels as no old name was specified")]
    MissingOldName,

    /// The label name is empty.
    #[error("Label name must not be empty")]
    EmptyName,

    /// The color is not a six digit hex value.
    #[error("Label color '{color}' must be six hex digits, e.g. 'd73a4a'")]
    InvalidColor { color: String },
}
