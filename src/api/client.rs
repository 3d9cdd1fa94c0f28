//! Blocking Bitbucket 2.0 client.
//!
//! Provides HTTP client creation with timeouts, URL construction with
//! per-segment encoding, and strict status checking for each endpoint.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::BranchHost;
use crate::error::{Result, SweepError};
use crate::models::{Branch, Page, Repository};

pub const DEFAULT_BASE_URL: &str = "https://api.bitbucket.org/2.0";

// HTTP Constants
pub(crate) const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
pub(crate) const HTTP_REQUEST_TIMEOUT_SECS: u64 = 120; // Total request timeout (includes connection + transfer)

/// Create an HTTP client with timeout configuration.
/// - connect_timeout: Maximum time to establish a TCP connection
/// - timeout: Maximum time for the entire request (connection + data transfer)
pub(crate) fn create_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
        .user_agent(concat!("sweep/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| SweepError::Transport {
            context: "Failed to create HTTP client".to_string(),
            source,
        })
}

/// Check that the response carries exactly the `expected` status.
pub(crate) fn expect_status(response: &Response, expected: StatusCode, context: &str) -> Result<()> {
    check_status(response.status(), expected, context)
}

fn check_status(status: StatusCode, expected: StatusCode, context: &str) -> Result<()> {
    if status != expected {
        return Err(SweepError::Api {
            context: context.to_string(),
            status: status.as_u16(),
            reason: status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        });
    }
    Ok(())
}

/// Authenticated client scoped to one API base URL.
pub struct BitbucketClient {
    base_url: Url,
    token: String,
    http: Client,
}

impl BitbucketClient {
    pub fn with_base_url(base_url: &str, token: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SweepError::config(format!("Invalid API base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SweepError::config(format!(
                "Invalid API base URL '{base_url}': cannot hold a path"
            )));
        }

        Ok(Self {
            base_url,
            token: token.into(),
            http: create_http_client()?,
        })
    }

    /// Join `segments` onto the base URL, encoding each one separately so a
    /// branch like `feature/login` stays a single segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn send(&self, request: RequestBuilder, context: &str) -> Result<Response> {
        request
            .bearer_auth(&self.token)
            .send()
            .map_err(|source| SweepError::Transport {
                context: context.to_string(),
                source,
            })
    }

    fn get_page<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<Page<T>> {
        tracing::debug!(%url, "GET");
        let response = self.send(self.http.get(url), context)?;
        expect_status(&response, StatusCode::OK, context)?;

        let body = response.text().map_err(|source| SweepError::Transport {
            context: context.to_string(),
            source,
        })?;
        let page: Page<T> = serde_json::from_str(&body).map_err(|e| SweepError::Parse {
            context: context.to_string(),
            message: e.to_string(),
        })?;

        if page.has_more() {
            tracing::warn!(
                returned = page.values.len(),
                total = ?page.size,
                "{context}: only the first page was read"
            );
        }
        Ok(page)
    }
}

impl BranchHost for BitbucketClient {
    fn list_repositories(&self, workspace: &str) -> Result<Page<Repository>> {
        let url = self.endpoint(&["repositories", workspace]);
        self.get_page(url, "Failed to fetch repositories")
    }

    fn list_branches(&self, workspace: &str, repo_slug: &str) -> Result<Page<Branch>> {
        let url = self.endpoint(&["repositories", workspace, repo_slug, "refs", "branches"]);
        let context = format!("Failed to fetch branches for repo {repo_slug}");
        self.get_page(url, &context)
    }

    fn delete_branch(&self, workspace: &str, repo_slug: &str, branch_name: &str) -> Result<()> {
        let url = self.endpoint(&[
            "repositories",
            workspace,
            repo_slug,
            "refs",
            "branches",
            branch_name,
        ]);
        let context = format!("Failed to delete branch {branch_name}");

        tracing::debug!(%url, "DELETE");
        let response = self.send(self.http.delete(url), &context)?;
        expect_status(&response, StatusCode::NO_CONTENT, &context)
    }
}
