//! Authenticated GitHub clients.
//!
//! [`RepoClient`] binds an octocrab instance to one repository and wraps
//! the handful of issue and comment calls the migration needs.
//! [`ClientSet`] owns the source and destination clients plus one client
//! per configured author token, and picks the credential a migrated item
//! is posted under.

mod error;
mod new_issue;

pub use error::ClientError;
pub use new_issue::NewIssue;

use crate::config::{RepoSettings, Settings};
use octocrab::models::issues::{Comment, Issue};
use octocrab::models::IssueState;
use octocrab::params::State;
use octocrab::Octocrab;
use std::collections::HashMap;
use tracing::debug;

/// Items fetched per page when listing issues or comments.
const PAGE_SIZE: u8 = 100;

/// An octocrab instance bound to one repository.
#[derive(Clone)]
pub struct RepoClient {
    octocrab: Octocrab,
    settings: RepoSettings,
}

impl RepoClient {
    /// Builds a client for the repository described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the octocrab client can't be built.
    pub fn new(settings: RepoSettings) -> Result<Self, ClientError> {
        let octocrab = build_octocrab(&settings.token, &settings.api_root)?;
        Ok(Self { octocrab, settings })
    }

    /// The repository this client is bound to.
    pub fn settings(&self) -> &RepoSettings {
        &self.settings
    }

    /// The underlying octocrab instance.
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }

    fn issues(&self) -> octocrab::issues::IssueHandler<'_> {
        self.octocrab
            .issues(&self.settings.owner, &self.settings.name)
    }

    /// Fetches one issue by number.
    pub async fn issue(&self, number: u64) -> Result<Issue, octocrab::Error> {
        self.issues().get(number).await
    }

    /// Fetches one page of the issue list.
    ///
    /// `labels` filters to issues carrying every listed label (the API's
    /// AND semantics). Pull requests are NOT filtered here; the listing
    /// endpoint returns them and callers drop them.
    pub async fn issues_page(
        &self,
        state: State,
        labels: Option<&Vec<String>>,
        page: u32,
    ) -> Result<Vec<Issue>, octocrab::Error> {
        let handler = self.issues();
        let mut request = handler.list().state(state).per_page(PAGE_SIZE).page(page);
        if let Some(labels) = labels {
            request = request.labels(labels);
        }
        Ok(request.send().await?.items)
    }

    /// Fetches one page of an issue's comments, ascending page order.
    pub async fn comments_page(
        &self,
        number: u64,
        page: u32,
    ) -> Result<Vec<Comment>, octocrab::Error> {
        Ok(self
            .issues()
            .list_comments(number)
            .per_page(PAGE_SIZE)
            .page(page)
            .send()
            .await?
            .items)
    }

    /// Creates an issue, posting through `poster`'s credential.
    pub async fn create_issue_with(
        &self,
        poster: &Octocrab,
        new_issue: &NewIssue,
    ) -> Result<Issue, octocrab::Error> {
        poster
            .issues(&self.settings.owner, &self.settings.name)
            .create(&new_issue.title)
            .body(&new_issue.body)
            .labels(new_issue.labels.clone())
            .assignees(new_issue.assignees.clone())
            .send()
            .await
    }

    /// Creates a comment under this client's own credential.
    pub async fn create_comment(
        &self,
        number: u64,
        body: &str,
    ) -> Result<Comment, octocrab::Error> {
        self.issues().create_comment(number, body).await
    }

    /// Creates a comment, posting through `poster`'s credential.
    pub async fn create_comment_with(
        &self,
        poster: &Octocrab,
        number: u64,
        body: &str,
    ) -> Result<Comment, octocrab::Error> {
        poster
            .issues(&self.settings.owner, &self.settings.name)
            .create_comment(number, body)
            .await
    }

    /// Closes an issue.
    pub async fn close_issue(&self, number: u64) -> Result<Issue, octocrab::Error> {
        self.issues()
            .update(number)
            .state(IssueState::Closed)
            .send()
            .await
    }
}

/// The full set of authenticated clients for one migration run.
pub struct ClientSet {
    source: RepoClient,
    destination: RepoClient,
    user_clients: HashMap<String, Octocrab>,
}

impl ClientSet {
    /// Builds the source and destination clients plus one client per
    /// configured author token. User clients authenticate against the
    /// destination's API root, since that is where they post.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if any client can't be built.
    pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        let source = RepoClient::new(settings.source.clone())?;
        let destination = RepoClient::new(settings.destination.clone())?;

        let mut user_clients = HashMap::new();
        for user in &settings.user_tokens {
            let octocrab = build_octocrab(&user.token, &settings.destination.api_root)?;
            user_clients.insert(user.username.clone(), octocrab);
        }
        debug!(user_clients = user_clients.len(), "Clients built");

        Ok(Self {
            source,
            destination,
            user_clients,
        })
    }

    /// Client for the repository issues are read from.
    pub fn source(&self) -> &RepoClient {
        &self.source
    }

    /// Client for the repository issues are recreated in.
    pub fn destination(&self) -> &RepoClient {
        &self.destination
    }

    /// Credential used to post as `author`: the author's own client when
    /// a token is configured for them, the destination client otherwise.
    /// The flag reports whether identity is preserved.
    pub fn poster_for(&self, author: &str) -> (&Octocrab, bool) {
        match self.user_clients.get(author) {
            Some(octocrab) => (octocrab, true),
            None => (self.destination.octocrab(), false),
        }
    }
}

fn build_octocrab(token: &str, api_root: &str) -> Result<Octocrab, octocrab::Error> {
    Octocrab::builder()
        .base_uri(api_root)?
        .personal_token(token.to_string())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserToken;

    fn repo(owner: &str, name: &str, token: &str) -> RepoSettings {
        RepoSettings {
            owner: owner.to_string(),
            name: name.to_string(),
            token: token.to_string(),
            api_root: "https://api.github.com".to_string(),
            html_root: "https://github.com".to_string(),
        }
    }

    fn settings() -> Settings {
        Settings {
            source: repo("acme", "legacy", "src-token"),
            destination: repo("acme", "fresh", "dst-token"),
            user_tokens: vec![UserToken {
                username: "alice".to_string(),
                token: "alice-token".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn poster_for_known_author_preserves_identity() {
        let clients = ClientSet::from_settings(&settings()).unwrap();
        let (_, identity_preserved) = clients.poster_for("alice");
        assert!(identity_preserved);
    }

    #[tokio::test]
    async fn poster_for_unknown_author_uses_the_destination_credential() {
        let clients = ClientSet::from_settings(&settings()).unwrap();
        let (_, identity_preserved) = clients.poster_for("mallory");
        assert!(!identity_preserved);
    }
}
