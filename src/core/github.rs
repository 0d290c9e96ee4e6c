//! GitHub REST client.
//!
//! Only the two Actions secrets endpoints this tool needs:
//! get the repository public key, and create or update a secret.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::core::constants;
use crate::core::domain::{EncryptedSecret, RepoPublicKey, Target};
use crate::core::sync::SecretStore;
use crate::error::RemoteError;

/// Authenticated GitHub API client
///
/// Cloning is cheap and clones share one connection pool. `reqwest::Client`
/// is safe for concurrent use, which the upload workers rely on.
#[derive(Clone)]
pub struct GitHubClient {
    base_url: Url,
    client: Client,
    token: Option<Zeroizing<String>>,
}

impl GitHubClient {
    /// Create a client for the given API base URL
    ///
    /// A missing token is not an error here; the API answers 401.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::InvalidUrl` for an unusable base URL, or
    /// `RemoteError::Client` if the HTTP client cannot be built.
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self, RemoteError> {
        let base_url = Url::parse(api_url).map_err(|e| RemoteError::InvalidUrl {
            url: api_url.to_string(),
            reason: e.to_string(),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl {
                url: api_url.to_string(),
                reason: "not a base url".to_string(),
            });
        }

        Ok(Self {
            base_url,
            client: Self::create_client()?,
            token: token.filter(|t| !t.is_empty()).map(Zeroizing::new),
        })
    }

    fn create_client() -> Result<Client, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(constants::ACCEPT));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(constants::API_VERSION),
        );

        Client::builder()
            .default_headers(headers)
            .user_agent(constants::USER_AGENT)
            .pool_max_idle_per_host(constants::DEFAULT_WORKERS * 2)
            .pool_idle_timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(RemoteError::Client)
    }

    /// Scope the client to one repository
    pub fn repository(&self, target: Target) -> Repository {
        Repository {
            client: self.clone(),
            target,
        }
    }

    /// Build `{base}/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "not a base url".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        }
    }
}

/// Secrets endpoints of one repository
#[derive(Clone)]
pub struct Repository {
    client: GitHubClient,
    target: Target,
}

impl Repository {
    fn secrets_endpoint(&self, tail: &str) -> Result<Url, RemoteError> {
        self.client.endpoint(&[
            "repos",
            self.target.owner(),
            self.target.repo(),
            "actions",
            "secrets",
            tail,
        ])
    }

    /// Fetch the public key used to seal this repository's secrets
    ///
    /// `GET /repos/{owner}/{repo}/actions/secrets/public-key`
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on network failure or a non-success status.
    pub async fn public_key(&self) -> Result<RepoPublicKey, RemoteError> {
        let url = self.secrets_endpoint("public-key")?;
        debug!(repo = %self.target, "fetching public key");

        let response = self.client.authorize(self.client.client.get(url)).send().await?;
        let key: RepoPublicKey = check(response).await?.json().await?;

        debug!(repo = %self.target, key_id = %key.key_id, "public key fetched");
        Ok(key)
    }

    /// Create or update one secret
    ///
    /// `PUT /repos/{owner}/{repo}/actions/secrets/{name}`
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on network failure or a non-success status.
    pub async fn put_secret(&self, secret: &EncryptedSecret) -> Result<(), RemoteError> {
        let url = self.secrets_endpoint(secret.name())?;
        trace!(name = secret.name(), key_id = secret.key_id(), "uploading secret");

        let body = PutSecretBody {
            encrypted_value: secret.encrypted_value(),
            key_id: secret.key_id(),
        };
        let response = self
            .client
            .authorize(self.client.client.put(url))
            .json(&body)
            .send()
            .await?;
        let response = check(response).await?;

        debug!(name = secret.name(), status = %response.status(), "secret uploaded");
        Ok(())
    }
}

impl SecretStore for Repository {
    async fn put(&self, secret: &EncryptedSecret) -> Result<(), RemoteError> {
        self.put_secret(secret).await
    }
}

#[derive(Serialize)]
struct PutSecretBody<'a> {
    encrypted_value: &'a str,
    key_id: &'a str,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Turn a non-success response into `RemoteError::Status`
async fn check(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or_else(|_| text.trim().to_string());

    Err(RemoteError::Status { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn target() -> Target {
        Target::new(Some("acme"), Some("widgets")).unwrap()
    }

    fn sealed(name: &str) -> EncryptedSecret {
        EncryptedSecret::new(name.to_string(), "kid-1".to_string(), "c2VhbGVk".to_string())
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            GitHubClient::new("not a url", None),
            Err(RemoteError::InvalidUrl { .. })
        ));
        assert!(matches!(
            GitHubClient::new("mailto:octocat@example.com", None),
            Err(RemoteError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = GitHubClient::new("https://ghe.example.com/api/v3/", None).unwrap();
        let url = client.endpoint(&["repos", "acme", "widgets"]).unwrap();

        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/repos/acme/widgets");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = GitHubClient::new("https://api.github.com", None).unwrap();
        let url = client.endpoint(&["repos", "a/b", "c d"]).unwrap();

        assert_eq!(url.as_str(), "https://api.github.com/repos/a%2Fb/c%20d");
    }

    #[tokio::test]
    async fn test_public_key_fetch() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/acme/widgets/actions/secrets/public-key")
            .match_header("authorization", "Bearer t0ken")
            .match_header("accept", "application/vnd.github+json")
            .match_header("x-github-api-version", "2022-11-28")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"key_id":"kid-1","key":"AAAA"}"#)
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), Some("t0ken".to_string())).unwrap();
        let key = client.repository(target()).public_key().await.unwrap();

        assert_eq!(key.key_id, "kid-1");
        assert_eq!(key.key, "AAAA");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_public_key_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/acme/widgets/actions/secrets/public-key")
            .with_status(404)
            .with_body(r#"{"message":"Not Found","documentation_url":"https://docs.github.com"}"#)
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), None).unwrap();
        let err = client.repository(target()).public_key().await.unwrap_err();

        match err {
            RemoteError::Status { status, message } => {
                assert_eq!(status.as_u16(), 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_no_token_sends_no_authorization() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/acme/widgets/actions/secrets/public-key")
            .match_header("authorization", Matcher::Missing)
            .with_status(401)
            .with_body(r#"{"message":"Requires authentication"}"#)
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), Some(String::new())).unwrap();
        let err = client.repository(target()).public_key().await.unwrap_err();

        assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_put_secret() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/repos/acme/widgets/actions/secrets/API_KEY")
            .match_header("authorization", "Bearer t0ken")
            .match_body(Matcher::Json(json!({
                "encrypted_value": "c2VhbGVk",
                "key_id": "kid-1",
            })))
            .with_status(201)
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), Some("t0ken".to_string())).unwrap();
        client
            .repository(target())
            .put_secret(&sealed("API_KEY"))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_put_secret_update_returns_no_content() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PUT", "/repos/acme/widgets/actions/secrets/DB_PASS")
            .with_status(204)
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), None).unwrap();
        let repo = client.repository(target());

        assert!(repo.put(&sealed("DB_PASS")).await.is_ok());
    }

    #[tokio::test]
    async fn test_put_secret_plain_text_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PUT", "/repos/acme/widgets/actions/secrets/API_KEY")
            .with_status(502)
            .with_body("bad gateway\n")
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), None).unwrap();
        let err = client
            .repository(target())
            .put_secret(&sealed("API_KEY"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("bad gateway"));
        assert!(err.user_friendly_message().contains("server error"));
    }
}
