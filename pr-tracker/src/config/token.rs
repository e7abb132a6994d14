//! GitHub token resolution.

use super::ConfigError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable consulted when no token flag is given.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// File name of the fallback token file.
const TOKEN_FILE_NAME: &str = ".github_personal_token";

/// Prefixes of classic and fine-grained personal access tokens.
const TOKEN_PREFIXES: &[&str] = &["ghp_", "github_pat_"];

/// Location of the fallback token file for this platform.
///
/// The home directory on macOS and Windows, the filesystem root on Linux.
#[must_use]
pub fn fallback_token_path() -> Option<PathBuf> {
    if cfg!(target_os = "linux") {
        Some(Path::new("/").join(TOKEN_FILE_NAME))
    } else if cfg!(any(target_os = "macos", target_os = "windows")) {
        dirs::home_dir().map(|home| home.join(TOKEN_FILE_NAME))
    } else {
        None
    }
}

/// Resolves the GitHub token from the flag, `GITHUB_TOKEN`, or the fallback file,
/// in that order.
///
/// # Errors
///
/// Returns [`ConfigError::MissingToken`] if no source yields a token and
/// [`ConfigError::MalformedToken`] if the token has an unexpected prefix.
pub fn resolve_token(explicit: Option<&str>) -> Result<String, ConfigError> {
    let from_env = std::env::var(TOKEN_ENV).ok();
    resolve_token_from(explicit, from_env.as_deref(), fallback_token_path().as_deref())
}

fn resolve_token_from(
    explicit: Option<&str>,
    from_env: Option<&str>,
    fallback: Option<&Path>,
) -> Result<String, ConfigError> {
    let non_empty = |value: &&str| !value.trim().is_empty();

    let token = if let Some(token) = explicit.filter(non_empty) {
        debug!("Using token from command line");
        token.trim().to_string()
    } else if let Some(token) = from_env.filter(non_empty) {
        debug!(var = TOKEN_ENV, "Using token from environment");
        token.trim().to_string()
    } else {
        let hint = fallback
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| TOKEN_FILE_NAME.to_string());
        let content = fallback
            .and_then(|path| std::fs::read_to_string(path).ok())
            .filter(|content| !content.trim().is_empty())
            .ok_or(ConfigError::MissingToken { hint })?;
        debug!("Using token from fallback file");
        content.trim().to_string()
    };

    validate_token(&token)?;
    Ok(token)
}

/// Checks that a token looks like a GitHub personal access token.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedToken`] otherwise.
pub fn validate_token(token: &str) -> Result<(), ConfigError> {
    if TOKEN_PREFIXES.iter().any(|prefix| token.starts_with(prefix)) {
        Ok(())
    } else {
        Err(ConfigError::MalformedToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn prefers_explicit_token() {
        let token = resolve_token_from(Some("ghp_flag"), Some("ghp_env"), None).unwrap();
        assert_eq!(token, "ghp_flag");
    }

    #[test]
    fn falls_back_to_environment() {
        let token = resolve_token_from(Some(""), Some("github_pat_env"), None).unwrap();
        assert_eq!(token, "github_pat_env");
    }

    #[test]
    fn falls_back_to_token_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(TOKEN_FILE_NAME);
        fs::write(&path, "ghp_from_file\n").unwrap();

        let token = resolve_token_from(None, None, Some(&path)).unwrap();
        assert_eq!(token, "ghp_from_file");
    }

    #[test]
    fn reports_missing_token() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(TOKEN_FILE_NAME);

        let result = resolve_token_from(None, Some("  "), Some(&path));
        assert!(matches!(result, Err(ConfigError::MissingToken { .. })));
    }

    #[test]
    fn rejects_malformed_token() {
        let result = resolve_token_from(Some("not-a-token"), None, None);
        assert!(matches!(result, Err(ConfigError::MalformedToken)));
    }

    #[test]
    fn resolve_token_reads_environment() {
        temp_env::with_var(TOKEN_ENV, Some("ghp_environment"), || {
            assert_eq!(resolve_token(None).unwrap(), "ghp_environment");
        });
    }

    #[test]
    fn resolve_token_prefers_flag_over_environment() {
        temp_env::with_var(TOKEN_ENV, Some("ghp_environment"), || {
            assert_eq!(resolve_token(Some("ghp_flag")).unwrap(), "ghp_flag");
        });
    }
}
