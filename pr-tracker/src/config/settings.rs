//! Optional settings file.
//!
//! A settings file overrides the built-in exclusion lists and the branch
//! protection rule applied by `add-protections`:
//!
//! ```toml
//! excluded-repositories = ["docs", "website"]
//! excluded-pr-titles = ["Spotless apply for branch", "[bot]"]
//!
//! [protection]
//! required-approving-review-count = 2
//! required-status-checks = ["ci / test"]
//! ```

use super::defaults::{DEFAULT_REQUIRED_STATUS_CHECK, EXCLUDED_PR_TITLES, EXCLUDED_REPOSITORIES};
use super::ConfigError;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Most approving reviews GitHub accepts for a protection rule.
const MAX_APPROVING_REVIEWS: u32 = 6;

/// Settings loaded from a TOML file, falling back to built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct TrackerSettings {
    /// Repository names never scanned when listing the whole organization.
    pub excluded_repositories: Vec<String>,

    /// Pull requests whose title contains any of these are not reported.
    pub excluded_pr_titles: Vec<String>,

    /// Rule applied by `add-protections`.
    pub protection: ProtectionSettings,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            excluded_repositories: EXCLUDED_REPOSITORIES
                .iter()
                .map(ToString::to_string)
                .collect(),
            excluded_pr_titles: EXCLUDED_PR_TITLES.iter().map(ToString::to_string).collect(),
            protection: ProtectionSettings::default(),
        }
    }
}

/// Branch protection applied to release branches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ProtectionSettings {
    pub required_approving_review_count: u32,
    pub require_code_owner_reviews: bool,
    pub required_status_checks: Vec<String>,
    pub require_conversation_resolution: bool,
}

impl Default for ProtectionSettings {
    fn default() -> Self {
        Self {
            required_approving_review_count: 1,
            require_code_owner_reviews: true,
            required_status_checks: vec![DEFAULT_REQUIRED_STATUS_CHECK.to_string()],
            require_conversation_resolution: true,
        }
    }
}

impl TrackerSettings {
    /// Loads and validates a settings file.
    ///
    /// Keys missing from the file keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid TOML,
    /// or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading settings");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let settings: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;

        settings.validate(path)?;
        Ok(settings)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let path_str = path.display().to_string();

        if self.excluded_pr_titles.iter().any(|t| t.is_empty()) {
            return Err(ConfigError::ValidationError {
                path: path_str,
                message: "excluded-pr-titles must not contain empty strings".to_string(),
            });
        }

        let reviews = self.protection.required_approving_review_count;
        if reviews > MAX_APPROVING_REVIEWS {
            return Err(ConfigError::ValidationError {
                path: path_str,
                message: format!(
                    "required-approving-review-count must be at most {MAX_APPROVING_REVIEWS}, got {reviews}"
                ),
            });
        }

        Ok(())
    }
}
