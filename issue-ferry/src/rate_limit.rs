//! Rate limit handling for the GitHub API.
//!
//! Two layers: a status check the CLI shows the operator before a batch,
//! and a retry guard that absorbs GitHub's secondary rate limit on
//! writes. Nothing here throttles pre-emptively; the guard only reacts to
//! an actual rate-limit failure.

use octocrab::Octocrab;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Cooldown observed after the secondary rate limit trips.
pub const SECONDARY_LIMIT_COOLDOWN: Duration = Duration::from_secs(65);

/// Documentation URL fragments that identify a secondary rate limit,
/// as opposed to other 403 causes.
const SECONDARY_LIMIT_DOC_MARKERS: [&str; 2] = ["secondary-rate-limit", "abuse-rate-limit"];

/// Core rate limit numbers for one authenticated client.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// Unix timestamp when the rate limit resets.
    pub reset: u64,
    /// Total requests allowed per window.
    pub limit: u32,
}

/// Fetches the current core rate limit status.
///
/// # Errors
///
/// Returns an error if the rate limit API call fails.
pub async fn check_rate_limit(octocrab: &Octocrab) -> Result<RateLimitInfo, octocrab::Error> {
    let rate_limit = octocrab.ratelimit().get().await?;
    let core = &rate_limit.resources.core;

    Ok(RateLimitInfo {
        remaining: core.remaining as u32,
        reset: core.reset,
        limit: core.limit as u32,
    })
}

/// Returns true if the error is GitHub's secondary rate limit response.
pub fn is_secondary_rate_limit(error: &octocrab::Error) -> bool {
    match error {
        octocrab::Error::GitHub { source, .. } => matches_signature(
            source.status_code.as_u16(),
            source.documentation_url.as_deref(),
        ),
        _ => false,
    }
}

/// The signature is HTTP 403 plus a documentation URL pointing at the
/// secondary rate limit docs.
fn matches_signature(status: u16, documentation_url: Option<&str>) -> bool {
    status == 403
        && documentation_url.is_some_and(|url| {
            SECONDARY_LIMIT_DOC_MARKERS
                .iter()
                .any(|marker| url.contains(marker))
        })
}

/// Retries `call` whenever it fails with the secondary rate limit.
///
/// Sleeps `cooldown` between attempts and retries without a cap; a real
/// rate limit always clears eventually, and every other error propagates
/// untouched.
///
/// # Errors
///
/// Returns the first error that is not a secondary rate limit.
pub async fn with_secondary_limit_retry<T, F, Fut>(
    cooldown: Duration,
    mut call: F,
) -> Result<T, octocrab::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, octocrab::Error>>,
{
    loop {
        match call().await {
            Err(e) if is_secondary_rate_limit(&e) => {
                warn!(
                    cooldown_secs = cooldown.as_secs(),
                    "Secondary rate limit hit, backing off"
                );
                tokio::time::sleep(cooldown).await;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_the_secondary_limit_signature() {
        assert!(matches_signature(
            403,
            Some("https://docs.github.com/en/rest/overview/rate-limits-for-the-rest-api#about-secondary-rate-limits")
        ));
        assert!(matches_signature(
            403,
            Some("https://docs.github.com/en/free-pro-team@latest/rest/overview/resources-in-the-rest-api#abuse-rate-limits")
        ));
    }

    #[test]
    fn other_forbidden_responses_do_not_match() {
        assert!(!matches_signature(
            403,
            Some("https://docs.github.com/rest/issues/issues#create-an-issue")
        ));
        assert!(!matches_signature(403, None));
    }

    #[test]
    fn status_must_be_forbidden() {
        assert!(!matches_signature(
            404,
            Some("https://docs.github.com/en/rest/overview/rate-limits-for-the-rest-api#about-secondary-rate-limits")
        ));
    }
}
