//! Results of stages that keep going after per-item failures.

use crate::github::ApiError;

/// A per-item failure recorded while a stage continued with the remaining items.
#[derive(Debug)]
pub struct Failure {
    /// What failed, usually an `"<org>/<repo>"` key.
    pub subject: String,

    /// The error returned for that item.
    pub error: ApiError,
}

impl Failure {
    pub fn new(subject: impl Into<String>, error: ApiError) -> Self {
        Self {
            subject: subject.into(),
            error,
        }
    }
}

/// Result of a batch operation over many repositories.
///
/// `Partial` still carries everything that was gathered; callers decide
/// whether that is enough to continue.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Every item was processed.
    Complete(T),

    /// Some items failed and were skipped.
    Partial {
        /// What was gathered from the items that succeeded.
        value: T,
        /// One entry per failed item.
        failures: Vec<Failure>,
    },
}

impl<T> Outcome<T> {
    /// Builds `Complete` when `failures` is empty, `Partial` otherwise.
    #[must_use]
    pub fn from_parts(value: T, failures: Vec<Failure>) -> Self {
        if failures.is_empty() {
            Self::Complete(value)
        } else {
            Self::Partial { value, failures }
        }
    }

    /// Returns the gathered value.
    pub fn value(&self) -> &T {
        match self {
            Self::Complete(value) | Self::Partial { value, .. } => value,
        }
    }

    /// Returns the recorded failures, empty when complete.
    pub fn failures(&self) -> &[Failure] {
        match self {
            Self::Complete(_) => &[],
            Self::Partial { failures, .. } => failures,
        }
    }

    /// Returns true if any item failed.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }

    /// Splits into the gathered value and the failures.
    pub fn into_parts(self) -> (T, Vec<Failure>) {
        match self {
            Self::Complete(value) => (value, Vec::new()),
            Self::Partial { value, failures } => (value, failures),
        }
    }

    /// Discards the failures.
    pub fn into_value(self) -> T {
        self.into_parts().0
    }
}
