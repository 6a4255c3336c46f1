//! Body rewriting for migrated issues and comments.
//!
//! Two concerns: turning the first bare `#N` token into a link that still
//! resolves after the text changes repositories, and appending the
//! attribution footer recording where the text came from.

use crate::config::RepoSettings;
use chrono::{DateTime, Utc};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// A word-bounded bare `#<digits>` issue reference.
static ISSUE_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|\W)#(\d+)\b").unwrap());

/// Rewrites the first bare `#N` token into a fully-qualified link to that
/// issue in the source repository.
///
/// Only the first occurrence is rewritten; later references keep their
/// bare form. A reference that actually meant the destination repository
/// is rewritten to the source anyway — known limitation.
pub fn link_first_issue_ref(text: &str, source: &RepoSettings) -> String {
    ISSUE_REF
        .replace(text, |caps: &Captures<'_>| {
            format!("{}{}/issues/{}", &caps[1], source.repo_url(), &caps[2])
        })
        .into_owned()
}

/// Appends the attribution footer to a migrated body.
///
/// Posted under the original author's own token, the footer stays
/// neutral; posted by the migration identity, it names the author so the
/// byline survives the move. Exactly one footer either way.
pub fn with_attribution(
    body: &str,
    author: &str,
    posted_at: DateTime<Utc>,
    original_url: &str,
    identity_preserved: bool,
) -> String {
    let posted_at = posted_at.to_rfc3339();
    if identity_preserved {
        format!("{body}\n\n*Originally posted at {posted_at} {original_url}*")
    } else {
        format!("{body}\n\n*Originally posted by @{author} at {posted_at} {original_url}*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn source_repo() -> RepoSettings {
        RepoSettings {
            owner: "acme".to_string(),
            name: "legacy".to_string(),
            token: "token".to_string(),
            api_root: "https://api.github.com".to_string(),
            html_root: "https://github.com".to_string(),
        }
    }

    #[test]
    fn rewrites_a_bare_issue_reference() {
        let rewritten = link_first_issue_ref("See #5 for context", &source_repo());
        assert_eq!(
            rewritten,
            "See https://github.com/acme/legacy/issues/5 for context"
        );
    }

    #[test]
    fn rewrites_a_reference_at_start_of_text() {
        let rewritten = link_first_issue_ref("#12 is related", &source_repo());
        assert_eq!(
            rewritten,
            "https://github.com/acme/legacy/issues/12 is related"
        );
    }

    #[test]
    fn rewrites_only_the_first_of_several_references() {
        let rewritten = link_first_issue_ref("Duplicates #3, supersedes #4", &source_repo());
        assert_eq!(
            rewritten,
            "Duplicates https://github.com/acme/legacy/issues/3, supersedes #4"
        );
    }

    #[test]
    fn leaves_text_without_references_unchanged() {
        let text = "Nothing to see here, move along";
        assert_eq!(link_first_issue_ref(text, &source_repo()), text);
    }

    #[test]
    fn ignores_references_embedded_in_words() {
        let text = "The channel irc#42 is not an issue";
        assert_eq!(link_first_issue_ref(text, &source_repo()), text);
    }

    #[test]
    fn generic_footer_names_the_author() {
        let posted_at = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let body = with_attribution(
            "Original text",
            "alice",
            posted_at,
            "https://github.com/acme/legacy/issues/10",
            false,
        );
        assert_eq!(
            body,
            "Original text\n\n*Originally posted by @alice at 2023-01-01T00:00:00+00:00 \
             https://github.com/acme/legacy/issues/10*"
        );
    }

    #[test]
    fn identity_preserving_footer_omits_the_mention() {
        let posted_at = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let body = with_attribution(
            "Original text",
            "alice",
            posted_at,
            "https://github.com/acme/legacy/issues/10",
            true,
        );
        assert!(body.starts_with("Original text\n\n*Originally posted at "));
        assert!(!body.contains("@alice"));
    }
}
