//! Migration error types.

use crate::client::ClientError;
use crate::config::ConfigError;
use thiserror::Error;

/// Errors that can occur while setting up or running a migration.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Settings loading errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Client construction errors.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHub(#[from] octocrab::Error),
}
