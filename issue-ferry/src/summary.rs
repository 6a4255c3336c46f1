//! Batch run summary.

use crate::migrate::MigratedIssue;

/// Result of migrating one issue within a batch.
#[derive(Debug, Clone)]
pub enum MigrationResult {
    /// Issue fully migrated.
    Migrated(MigratedIssue),

    /// Migration failed. The issue may be partially migrated: the
    /// destination issue can exist with some comments while the source
    /// stays open and un-linked.
    Failed {
        /// Issue number in the source repository.
        source_number: u64,
        /// Error message.
        error: String,
    },
}

/// Summary of a batch migration run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Issues fully migrated.
    pub migrated: usize,

    /// Issues that failed (possibly partially migrated).
    pub failed: usize,

    /// Comments replayed across all migrated issues.
    pub comments_replayed: usize,
}

impl RunSummary {
    /// Updates the summary with one migration result.
    pub fn record(&mut self, result: &MigrationResult) {
        match result {
            MigrationResult::Migrated(issue) => {
                self.migrated += 1;
                self.comments_replayed += issue.comments;
            }
            MigrationResult::Failed { .. } => self.failed += 1,
        }
    }

    /// Returns true if any migration failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Returns true if every migration succeeded.
    #[must_use]
    pub fn all_success(&self) -> bool {
        self.failed == 0
    }
}
