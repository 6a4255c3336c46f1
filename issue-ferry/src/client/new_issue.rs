//! Create-request projection for a destination issue.

/// What gets posted to the destination repository for one source issue:
/// the source issue's title (already prefixed), labels, and assignee
/// logins, plus the transformed body.
#[derive(Debug, Clone)]
pub struct NewIssue {
    /// Destination issue title.
    pub title: String,

    /// Transformed body, attribution footer included.
    pub body: String,

    /// Label names carried over from the source issue.
    pub labels: Vec<String>,

    /// Assignee logins carried over from the source issue.
    pub assignees: Vec<String>,
}
