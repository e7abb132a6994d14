//! Bulk label creation and editing.
//!
//! A label is either renamed/edited in place (when `old_name` exists on the
//! repository) or created fresh. With `update_only` repositories lacking the
//! old label are left alone.

mod error;
mod status;

pub use error::LabelError;
pub use status::{LabelResult, LabelStatus};

use crate::config::ClientContext;
use crate::github::{ApiError, GitHubApi};
use crate::outcome::{Failure, Outcome};
use crate::types::{repo_key, Label, Repository};
use tracing::{error, info, info_span, Instrument};

/// A label to create, or to apply over an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelData {
    /// Name the label ends up with.
    pub name: String,

    /// Existing label to rename/edit, if any.
    pub old_name: Option<String>,

    /// Hex color, with or without a leading `#`.
    pub color: Option<String>,

    /// Label description.
    pub description: Option<String>,

    /// Only edit existing labels, never create new ones.
    pub update_only: bool,
}

impl LabelData {
    /// Checks the request and normalizes the color.
    ///
    /// Empty optional values are treated as not given.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError`] if the request cannot be carried out.
    pub fn validated(mut self) -> Result<Self, LabelError> {
        self.old_name = self.old_name.filter(|name| !name.is_empty());
        self.description = self.description.filter(|desc| !desc.is_empty());
        self.color = self
            .color
            .map(|color| color.trim_start_matches('#').to_string())
            .filter(|color| !color.is_empty());

        if self.update_only && self.old_name.is_none() {
            return Err(LabelError::MissingOldName);
        }

        if self.name.trim().is_empty() {
            return Err(LabelError::EmptyName);
        }

        if let Some(color) = &self.color {
            if color.len() != 6 || !color.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(LabelError::InvalidColor {
                    color: color.clone(),
                });
            }
        }

        Ok(self)
    }

    fn to_label(&self) -> Label {
        Label {
            name: self.name.clone(),
            color: self.color.clone(),
            description: self.description.clone(),
        }
    }
}

/// Creates or updates the label on every repository.
///
/// Failing repositories are recorded and the rest are still processed.
///
/// # Errors
///
/// Returns [`LabelError`] if the request is invalid; no repository is touched then.
pub async fn create_label_on_repositories(
    api: &dyn GitHubApi,
    ctx: &ClientContext,
    repos: &[Repository],
    data: LabelData,
) -> Result<Outcome<Vec<LabelResult>>, LabelError> {
    let data = data.validated()?;
    let span = info_span!("create_label", label = %data.name, repositories = repos.len());

    async {
        let mut results = Vec::new();
        let mut failures = Vec::new();

        for repo in repos {
            let key = repo_key(ctx.org(), &repo.name);
            match create_label_on_repository(api, ctx, repo, &data).await {
                Ok(status) => results.push(LabelResult {
                    repository: key,
                    status,
                }),
                Err(e) => {
                    error!(repo = %key, error = %e, "Failed to add or update label");
                    failures.push(Failure::new(key, e));
                }
            }
        }

        Ok(Outcome::from_parts(results, failures))
    }
    .instrument(span)
    .await
}

async fn create_label_on_repository(
    api: &dyn GitHubApi,
    ctx: &ClientContext,
    repo: &Repository,
    data: &LabelData,
) -> Result<LabelStatus, ApiError> {
    let key = repo_key(ctx.org(), &repo.name);
    let label = data.to_label();

    if let Some(old_name) = &data.old_name {
        if api.get_label(ctx.org(), &repo.name, old_name).await?.is_some() {
            api.edit_label(ctx.org(), &repo.name, old_name, &label)
                .await?;
            info!(repo = %key, old_name = %old_name, name = %data.name, "Updated label");
            return Ok(LabelStatus::Updated {
                old_name: old_name.clone(),
            });
        }
    }

    if data.update_only {
        return Ok(LabelStatus::Skipped {
            reason: "no label to update".to_string(),
        });
    }

    api.create_label(ctx.org(), &repo.name, &label).await?;
    info!(repo = %key, name = %data.name, "Created label");
    Ok(LabelStatus::Created)
}
