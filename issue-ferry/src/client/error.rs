//! Client construction error types.

use thiserror::Error;

/// Errors that can occur while building the authenticated clients.
#[derive(Debug, Error)]
pub enum ClientError {
    /// GitHub client construction failed.
    #[error("Failed to build GitHub client: {0}")]
    Build(#[from] octocrab::Error),
}
