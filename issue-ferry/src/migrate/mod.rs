//! Migration orchestration.
//!
//! [`Migrator`] owns the per-issue migration procedure and the batch
//! strategies the CLI drives: one issue at a time, open issues matching a
//! label set, or every issue in the repository.

mod error;
mod outcome;

pub use error::MigrateError;
pub use outcome::MigratedIssue;

use crate::body;
use crate::client::{ClientSet, NewIssue};
use crate::config::{RepoSettings, Settings};
use crate::pagination::paged;
use crate::rate_limit::{
    check_rate_limit, with_secondary_limit_retry, RateLimitInfo, SECONDARY_LIMIT_COOLDOWN,
};
use crate::summary::{MigrationResult, RunSummary};
use futures::future;
use futures::stream::{self, StreamExt, TryStreamExt};
use octocrab::models::issues::{Comment, Issue};
use octocrab::models::IssueState;
use octocrab::params::State;
use std::time::Duration;
use tracing::{error, info, info_span, Instrument};

/// Orchestrates issue migrations between the configured repositories.
pub struct Migrator {
    clients: ClientSet,
    cooldown: Duration,
    concurrency: usize,
}

impl Migrator {
    /// Builds a migrator from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError`] if the API clients can't be built.
    pub fn new(settings: &Settings) -> Result<Self, MigrateError> {
        Ok(Self {
            clients: ClientSet::from_settings(settings)?,
            cooldown: SECONDARY_LIMIT_COOLDOWN,
            concurrency: 1,
        })
    }

    /// Overrides the secondary rate limit cooldown.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Sets how many migrations a label batch keeps in flight at once.
    /// The default of 1 keeps batches strictly sequential.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// The repository issues are read from.
    pub fn source(&self) -> &RepoSettings {
        self.clients.source().settings()
    }

    /// The repository issues are recreated in.
    pub fn destination(&self) -> &RepoSettings {
        self.clients.destination().settings()
    }

    /// Core rate limit numbers for the destination credential.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError`] if the rate limit call fails.
    pub async fn rate_limit(&self) -> Result<RateLimitInfo, MigrateError> {
        Ok(check_rate_limit(self.clients.destination().octocrab()).await?)
    }

    /// Fetches one source issue by number.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError`] if the issue can't be fetched; an invalid
    /// number surfaces here as the API's not-found error.
    pub async fn fetch_issue(&self, number: u64) -> Result<Issue, MigrateError> {
        Ok(self.clients.source().issue(number).await?)
    }

    /// All open source issues carrying every one of `labels`, pull
    /// requests excluded.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError`] if any page fetch fails.
    pub async fn open_issues_with_labels(
        &self,
        labels: &[String],
    ) -> Result<Vec<Issue>, MigrateError> {
        let source = self.clients.source();
        let labels = labels.to_vec();
        let issues = paged(|page| {
            let labels = labels.clone();
            async move { source.issues_page(State::Open, Some(&labels), page).await }
        })
        .try_filter(|issue| future::ready(issue.pull_request.is_none()))
        .try_collect::<Vec<Issue>>()
        .await?;
        Ok(issues)
    }

    /// Every source issue, open and closed, ascending by number. Pull
    /// requests excluded.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError`] if any page fetch fails.
    pub async fn all_issues(&self) -> Result<Vec<Issue>, MigrateError> {
        let source = self.clients.source();
        let mut issues = paged(|page| async move {
            source.issues_page(State::All, None, page).await
        })
        .try_filter(|issue| future::ready(issue.pull_request.is_none()))
        .try_collect::<Vec<Issue>>()
        .await?;
        issues.sort_by_key(|issue| issue.number);
        Ok(issues)
    }

    /// Migrates one issue.
    ///
    /// Creates the destination copy, replays its comments oldest first,
    /// back-links and closes the source issue, and mirrors a closed state
    /// onto the destination. The destination issue is created open even
    /// for a closed source issue, so it briefly exists open before the
    /// mirroring step.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError`] on the first failing API call. A failure
    /// after the destination issue exists leaves a partial migration
    /// behind: the destination issue may carry some comments while the
    /// source stays open and un-linked.
    pub async fn migrate_issue(&self, issue: &Issue) -> Result<MigratedIssue, MigrateError> {
        let span = info_span!("migrate_issue", number = issue.number);

        async {
            let source = self.clients.source();
            let destination = self.clients.destination();

            let author = issue.user.login.as_str();
            let (poster, identity_preserved) = self.clients.poster_for(author);
            let linked =
                body::link_first_issue_ref(issue.body.as_deref().unwrap_or_default(), source.settings());
            let new_issue = NewIssue {
                title: format!("[{}] {}", source.settings().name, issue.title),
                body: body::with_attribution(
                    &linked,
                    author,
                    issue.created_at,
                    issue.html_url.as_str(),
                    identity_preserved,
                ),
                labels: issue.labels.iter().map(|label| label.name.clone()).collect(),
                assignees: issue
                    .assignees
                    .iter()
                    .map(|assignee| assignee.login.clone())
                    .collect(),
            };

            info!(title = %new_issue.title, "Creating destination issue");
            let created = destination.create_issue_with(poster, &new_issue).await?;

            // Replay order is the only ordering signal that survives the
            // move; ascending pages are chronological.
            let number = issue.number;
            let comments = paged(|page| async move { source.comments_page(number, page).await })
                .try_collect::<Vec<Comment>>()
                .await?;
            info!(count = comments.len(), "Replaying comments");
            for comment in &comments {
                self.replay_comment(created.number, comment).await?;
            }

            // Migration consumes the source issue: back-link, then close.
            let back_link = format!(
                "Issue migrated to {}#{}",
                destination.settings().full_name(),
                created.number
            );
            source.create_comment(issue.number, &back_link).await?;
            source.close_issue(issue.number).await?;

            if matches!(issue.state, IssueState::Closed) {
                destination.close_issue(created.number).await?;
            }

            info!(
                source_number = issue.number,
                destination_number = created.number,
                "Issue migrated"
            );
            Ok(MigratedIssue {
                source_number: issue.number,
                number: created.number,
                url: created.html_url.to_string(),
                comments: comments.len(),
            })
        }
        .instrument(span)
        .await
    }

    /// Replays one comment onto the destination issue through the
    /// rate limit guard.
    async fn replay_comment(
        &self,
        destination_number: u64,
        comment: &Comment,
    ) -> Result<(), MigrateError> {
        let author = comment.user.login.as_str();
        let (poster, identity_preserved) = self.clients.poster_for(author);
        let linked = body::link_first_issue_ref(
            comment.body.as_deref().unwrap_or_default(),
            self.clients.source().settings(),
        );
        let replayed = body::with_attribution(
            &linked,
            author,
            comment.created_at,
            comment.html_url.as_str(),
            identity_preserved,
        );

        let destination = self.clients.destination();
        with_secondary_limit_retry(self.cooldown, || {
            destination.create_comment_with(poster, destination_number, &replayed)
        })
        .await?;
        Ok(())
    }

    /// Migrates `issues` strictly sequentially, aborting the batch on the
    /// first failure and leaving the remaining issues unmigrated.
    pub async fn migrate_sequential(&self, issues: &[Issue]) -> RunSummary {
        let mut summary = RunSummary::default();
        for issue in issues {
            match self.migrate_issue(issue).await {
                Ok(migrated) => summary.record(&MigrationResult::Migrated(migrated)),
                Err(e) => {
                    error!(number = issue.number, error = %e, "Migration failed, aborting batch");
                    summary.record(&MigrationResult::Failed {
                        source_number: issue.number,
                        error: e.to_string(),
                    });
                    break;
                }
            }
        }
        summary
    }

    /// Migrates `issues` with a bounded number of migrations in flight.
    ///
    /// The whole batch is awaited before returning; failures are recorded
    /// per issue and do not stop the rest of the batch.
    pub async fn migrate_bounded(&self, issues: Vec<Issue>) -> RunSummary {
        let mut summary = RunSummary::default();
        let results: Vec<MigrationResult> = stream::iter(issues)
            .map(|issue| async move {
                match self.migrate_issue(&issue).await {
                    Ok(migrated) => MigrationResult::Migrated(migrated),
                    Err(e) => {
                        error!(number = issue.number, error = %e, "Migration failed");
                        MigrationResult::Failed {
                            source_number: issue.number,
                            error: e.to_string(),
                        }
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for result in &results {
            summary.record(result);
        }
        summary
    }
}
