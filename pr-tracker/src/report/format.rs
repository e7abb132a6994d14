//! Output format selection.

use crate::config::ConfigError;
use std::fmt;
use std::str::FromStr;

/// How the pull request listing is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Log lines for reading in a terminal.
    #[default]
    Terminal,

    /// Markdown for pasting into a Discord message.
    Discord,
}

impl OutputFormat {
    /// Returns the flag value for this format.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Terminal => "terminal",
            Self::Discord => "discord",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "terminal" => Ok(Self::Terminal),
            "discord" => Ok(Self::Discord),
            _ => Err(ConfigError::UnsupportedFormat {
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
