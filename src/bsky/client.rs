use reqwest::StatusCode;
use serde_json::json;
use tracing::debug;

use super::models::{SearchPostsResponse, SessionResponse, UpstreamErrorBody};
use super::{FetchError, RawPost};
use crate::config::{AuthStrategy, Config};
use crate::constants::{MAX_SEARCH_LIMIT, USER_AGENT};

/// Client for the Bluesky XRPC endpoints used by search.
#[derive(Clone)]
pub struct BskyClient {
    client: reqwest::Client,
    auth: AuthStrategy,
    appview_url: String,
    entryway_url: String,
    identifier: Option<String>,
    app_password: Option<String>,
}

impl BskyClient {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(config.http_timeout)
                .build()
                .expect("Failed to build HTTP client"),
            auth: config.auth,
            appview_url: config.appview_url.trim_end_matches('/').to_string(),
            entryway_url: config.entryway_url.trim_end_matches('/').to_string(),
            identifier: config.identifier.clone(),
            app_password: config.app_password.clone(),
        }
    }

    /// Whether both upstream credentials are present.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.identifier.is_some() && self.app_password.is_some()
    }

    /// Create a session on the entryway and return the access token.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing, login is rejected, or the
    /// response carries no token.
    pub async fn create_session(&self) -> Result<String, FetchError> {
        let (Some(identifier), Some(password)) = (&self.identifier, &self.app_password) else {
            return Err(FetchError::Auth("missing credentials".to_string()));
        };

        let url = format!("{}/xrpc/com.atproto.server.createSession", self.entryway_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "identifier": identifier, "password": password }))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(FetchError::Auth(upstream_message(status, &body)));
        }

        let session: SessionResponse = serde_json::from_slice(&body)
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        session
            .access_jwt
            .filter(|jwt| !jwt.is_empty())
            .ok_or_else(|| FetchError::Auth("No access token from Bluesky".to_string()))
    }

    /// Fetch up to one page of posts matching the query.
    ///
    /// The requested page size is capped at [`MAX_SEARCH_LIMIT`] regardless of
    /// the caller-supplied value. With the session strategy a fresh login is
    /// performed first and the search runs against the entryway; otherwise the
    /// public AppView is queried unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns an error on login failure, transport failure, a non-success
    /// upstream status, or a malformed response body.
    pub async fn search_posts(&self, query: &str, limit: u32) -> Result<Vec<RawPost>, FetchError> {
        let limit = limit.min(MAX_SEARCH_LIMIT);

        let request = match self.auth {
            AuthStrategy::Public => {
                let url = format!(
                    "{}/xrpc/app.bsky.feed.searchPosts?q={}&limit={limit}",
                    self.appview_url,
                    urlencoding::encode(query)
                );
                self.client.get(url)
            }
            AuthStrategy::Session => {
                let access_jwt = self.create_session().await?;
                let url = format!(
                    "{}/xrpc/app.bsky.feed.searchPosts?q={}&limit={limit}",
                    self.entryway_url,
                    urlencoding::encode(query)
                );
                self.client.get(url).bearer_auth(access_jwt)
            }
        };

        let response = request.header("Accept", "application/json").send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(FetchError::Upstream(upstream_message(status, &body)));
        }

        let parsed: SearchPostsResponse =
            serde_json::from_slice(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        debug!(query, count = parsed.posts.len(), "Fetched posts from Bluesky");
        Ok(parsed.posts)
    }
}

/// Extract the upstream error message, falling back to the bare status.
fn upstream_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<UpstreamErrorBody>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
