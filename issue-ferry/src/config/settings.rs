//! Settings deserialization.

use super::ConfigError;
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Parsed contents of an issue-ferry settings file.
///
/// Immutable for the process lifetime; the orchestrator receives it as an
/// explicit value rather than reading ambient state.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Repository issues are read from (and closed in).
    pub source: RepoSettings,

    /// Repository issues are recreated in.
    pub destination: RepoSettings,

    /// Per-author credentials, so a migrated item can be posted as its
    /// original author instead of the migration identity.
    #[serde(default)]
    pub user_tokens: Vec<UserToken>,
}

/// One repository plus the credential used to talk to it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RepoSettings {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,

    /// Token authorized for this repository.
    pub token: String,

    /// REST API root (override for GitHub Enterprise instances).
    #[serde(default = "default_api_root")]
    pub api_root: String,

    /// Web root used when building issue links.
    #[serde(default = "default_html_root")]
    pub html_root: String,
}

/// A per-author credential.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserToken {
    /// Login the credential belongs to.
    pub username: String,

    /// That user's token.
    pub token: String,
}

impl RepoSettings {
    /// Full repository name in "owner/name" format.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Web URL of the repository.
    pub fn repo_url(&self) -> String {
        format!("{}/{}/{}", self.html_root, self.owner, self.name)
    }

    /// Web URL of one issue in the repository.
    pub fn issue_url(&self, number: u64) -> String {
        format!("{}/issues/{}", self.repo_url(), number)
    }
}

impl Settings {
    pub(crate) fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        validate_repo("source", &self.source, path)?;
        validate_repo("destination", &self.destination, path)?;

        for user in &self.user_tokens {
            if user.username.trim().is_empty() || user.token.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    path: path.display().to_string(),
                    message: "user-tokens entries need both username and token".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn validate_repo(section: &str, repo: &RepoSettings, path: &Path) -> Result<(), ConfigError> {
    for (field, value) in [
        ("owner", &repo.owner),
        ("name", &repo.name),
        ("token", &repo.token),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                message: format!("{section}.{field} must not be empty"),
            });
        }
    }

    for (field, value) in [("api-root", &repo.api_root), ("html-root", &repo.html_root)] {
        if Url::parse(value).is_err() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                message: format!("{section}.{field} is not a valid URL: '{value}'"),
            });
        }
    }

    Ok(())
}

pub(crate) fn default_api_root() -> String {
    "https://api.github.com".to_string()
}

pub(crate) fn default_html_root() -> String {
    "https://github.com".to_string()
}
