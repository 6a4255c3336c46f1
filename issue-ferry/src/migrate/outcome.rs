//! Migration outcome types.

/// A fully migrated issue.
#[derive(Debug, Clone)]
pub struct MigratedIssue {
    /// Issue number in the source repository.
    pub source_number: u64,

    /// Issue number created in the destination repository.
    pub number: u64,

    /// Web URL of the destination issue.
    pub url: String,

    /// Comments replayed onto the destination issue.
    pub comments: usize,
}
