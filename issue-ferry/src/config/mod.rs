//! Settings loading.
//!
//! This module parses the issue-ferry TOML settings file: the source and
//! destination repositories plus optional per-author tokens.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{RepoSettings, Settings, UserToken};

use std::path::Path;
use tracing::{debug, info};

/// Loads and validates a settings file.
///
/// The file looks like:
/// ```toml
/// [source]
/// owner = "acme"
/// name = "legacy-tracker"
/// token = "ghp_..."
///
/// [destination]
/// owner = "acme"
/// name = "tracker"
/// token = "ghp_..."
///
/// [[user-tokens]]
/// username = "alice"
/// token = "ghp_..."
/// ```
///
/// `api-root` and `html-root` default to the public github.com endpoints
/// and can be overridden per repository for Enterprise instances.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file can't be read, isn't valid TOML,
/// or fails validation.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    info!(path = %path.display(), "Loading settings");

    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let parsed: Settings = toml::from_str(&raw).map_err(|e| ConfigError::TomlError {
        path: path.display().to_string(),
        source: e,
    })?;

    parsed.validate(path)?;

    debug!(
        source = %parsed.source.full_name(),
        destination = %parsed.destination.full_name(),
        user_tokens = parsed.user_tokens.len(),
        "Settings loaded"
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_settings(dir: &Path, contents: &str) -> std::path::PathBuf {
        let path = dir.join("issue-ferry.toml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn can_load_settings() {
        let temp = TempDir::new().unwrap();
        let path = write_settings(
            temp.path(),
            r#"
[source]
owner = "acme"
name = "legacy"
token = "src-token"

[destination]
owner = "acme"
name = "fresh"
token = "dst-token"

[[user-tokens]]
username = "alice"
token = "alice-token"
"#,
        );

        let settings = load_settings(&path).unwrap();

        assert_eq!(settings.source.full_name(), "acme/legacy");
        assert_eq!(settings.destination.full_name(), "acme/fresh");
        assert_eq!(settings.source.api_root, "https://api.github.com");
        assert_eq!(settings.source.html_root, "https://github.com");
        assert_eq!(settings.user_tokens.len(), 1);
        assert_eq!(settings.user_tokens[0].username, "alice");
    }

    #[test]
    fn user_tokens_are_optional() {
        let temp = TempDir::new().unwrap();
        let path = write_settings(
            temp.path(),
            r#"
[source]
owner = "acme"
name = "legacy"
token = "src-token"

[destination]
owner = "acme"
name = "fresh"
token = "dst-token"
"#,
        );

        let settings = load_settings(&path).unwrap();
        assert!(settings.user_tokens.is_empty());
    }

    #[test]
    fn enterprise_roots_are_respected() {
        let temp = TempDir::new().unwrap();
        let path = write_settings(
            temp.path(),
            r#"
[source]
owner = "acme"
name = "legacy"
token = "src-token"
api-root = "https://ghe.example.com/api/v3"
html-root = "https://ghe.example.com"

[destination]
owner = "acme"
name = "fresh"
token = "dst-token"
"#,
        );

        let settings = load_settings(&path).unwrap();
        assert_eq!(
            settings.source.issue_url(42),
            "https://ghe.example.com/acme/legacy/issues/42"
        );
        assert_eq!(
            settings.destination.issue_url(7),
            "https://github.com/acme/fresh/issues/7"
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let temp = TempDir::new().unwrap();
        let result = load_settings(&temp.path().join("nonexistent.toml"));
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_settings(temp.path(), "[source\nowner = ");
        let result = load_settings(&path);
        assert!(matches!(result, Err(ConfigError::TomlError { .. })));
    }

    #[test]
    fn empty_owner_fails_validation() {
        let temp = TempDir::new().unwrap();
        let path = write_settings(
            temp.path(),
            r#"
[source]
owner = ""
name = "legacy"
token = "src-token"

[destination]
owner = "acme"
name = "fresh"
token = "dst-token"
"#,
        );

        let result = load_settings(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn bad_api_root_fails_validation() {
        let temp = TempDir::new().unwrap();
        let path = write_settings(
            temp.path(),
            r#"
[source]
owner = "acme"
name = "legacy"
token = "src-token"
api-root = "not a url"

[destination]
owner = "acme"
name = "fresh"
token = "dst-token"
"#,
        );

        let result = load_settings(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
