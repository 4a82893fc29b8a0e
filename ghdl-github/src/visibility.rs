//! Repository visibility probe

use ghdl_core::Credential;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{GitHubClient, Result};

/// Whether a repository is public or private
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// The part of `GET /repos/{owner}/{repo}` we care about
#[derive(Debug, Deserialize)]
struct RepoMetadata {
    private: bool,
}

impl GitHubClient {
    /// Ask GitHub whether `owner/repo` is private.
    ///
    /// The answer decides which content strategy a directory download uses.
    pub async fn probe_visibility(
        &self,
        owner: &str,
        repo: &str,
        credential: Option<&Credential>,
    ) -> Result<Visibility> {
        debug!(owner, repo, authenticated = credential.is_some(), "Probing repository visibility");

        let url = self.api_endpoint(["repos", owner, repo])?;
        let context = format!("{}/{}", owner, repo);
        let response = self
            .api_get(self.get(url, credential), credential.is_some(), &context)
            .await?;

        let metadata: RepoMetadata = response.json().await?;
        let visibility = if metadata.private {
            Visibility::Private
        } else {
            Visibility::Public
        };

        info!(owner, repo, ?visibility, "Repository visibility");
        Ok(visibility)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client_for, token};
    use crate::Error;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_public_repo_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/facebook/react"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "full_name": "facebook/react",
                "private": false
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let visibility = client.probe_visibility("facebook", "react", None).await.unwrap();
        assert_eq!(visibility, Visibility::Public);
    }

    #[tokio::test]
    async fn test_private_repo_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/secret"))
            .and(header("authorization", "token ghp_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "private": true
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let credential = token();
        let visibility = client
            .probe_visibility("acme", "secret", Some(&credential))
            .await
            .unwrap();
        assert_eq!(visibility, Visibility::Private);
    }

    #[tokio::test]
    async fn test_not_found_depends_on_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/secret"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let err = client.probe_visibility("acme", "secret", None).await.unwrap_err();
        assert!(matches!(
            err,
            Error::NotFoundOrPrivate { ref context } if context == "acme/secret"
        ));

        let credential = token();
        let err = client
            .probe_visibility("acme", "secret", Some(&credential))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_bad_token_and_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/badtoken"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/limited"))
            .respond_with(
                ResponseTemplate::new(403).insert_header("x-ratelimit-reset", "1700000000"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let credential = token();

        let err = client
            .probe_visibility("acme", "badtoken", Some(&credential))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidToken));

        let err = client.probe_visibility("acme", "limited", None).await.unwrap_err();
        assert!(matches!(err, Error::RateLimited { reset_at: Some(_) }));

        let err = client.probe_visibility("acme", "broken", None).await.unwrap_err();
        assert!(matches!(err, Error::UnknownApiError { status: 500, .. }));
    }
}
