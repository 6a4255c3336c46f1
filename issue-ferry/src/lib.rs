#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub use octocrab;

pub mod body;
pub mod client;
pub mod config;
pub mod migrate;
pub mod pagination;
pub mod rate_limit;
pub mod summary;

pub use client::{ClientError, ClientSet, NewIssue, RepoClient};
pub use config::{load_settings, ConfigError, RepoSettings, Settings, UserToken};
pub use migrate::{MigratedIssue, MigrateError, Migrator};
pub use pagination::paged;
pub use rate_limit::{
    check_rate_limit, is_secondary_rate_limit, with_secondary_limit_retry, RateLimitInfo,
    SECONDARY_LIMIT_COOLDOWN,
};
pub use summary::{MigrationResult, RunSummary};
