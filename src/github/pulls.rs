use crate::repo_ref::{RefError, RepoRef};
use anyhow::Context;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// GitHub REST endpoints, relative to the configured API base URL.
mod endpoints {
    pub fn open_pulls(base: &str, repo_path: &str) -> String {
        format!("{base}/repos/{repo_path}/pulls")
    }

    pub fn pull(base: &str, repo_path: &str, number: u64) -> String {
        format!("{base}/repos/{repo_path}/pulls/{number}")
    }
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = "pr-view";
const GITHUB_JSON: &str = "application/vnd.github+json";

/// A pull request as returned by the GitHub pulls API.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    /// Web URL of the pull request.
    pub html_url: String,
    /// The author.
    pub user: User,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub login: String,
}

/// Why fetching pull requests for one reference failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid repo {repo}")]
    InvalidRef {
        repo: String,
        #[source]
        source: RefError,
    },
    #[error("github API error: {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("request failed")]
    Transport(#[source] reqwest::Error),
    #[error("failed to decode response")]
    Decode(#[source] reqwest::Error),
    #[error("fetch task failed: {0}")]
    Task(String),
}

impl FetchError {
    /// HTTP status of an API error, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The message followed by every underlying cause, joined by `: `.
    ///
    /// reqwest keeps the interesting part (refused connection, timeout,
    /// missing JSON field) in the source chain, not in its own message.
    pub fn detailed(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

fn api_error<E: fmt::Display>(status: StatusCode, body: Result<String, E>) -> FetchError {
    let body = match body {
        Ok(body) => body.trim().to_string(),
        Err(e) => format!("<failed to read response body: {e}>"),
    };
    FetchError::Api { status, body }
}

/// Thin client over the pulls endpoints.
///
/// Cloning is cheap: the underlying `reqwest::Client` shares its connection
/// pool between clones.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(GitHubClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Fetches the open pull requests of `owner/name`, or the single pull
    /// request named by `owner/name#number`.
    ///
    /// Only the first page of open pull requests is requested.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, repo: &str) -> Result<Vec<PullRequest>, FetchError> {
        let repo_ref: RepoRef = repo.parse().map_err(|source| FetchError::InvalidRef {
            repo: repo.to_string(),
            source,
        })?;

        let repo_path = repo_ref.repo_path();
        let request = match repo_ref.number {
            Some(number) => self
                .http
                .get(endpoints::pull(&self.base_url, &repo_path, number)),
            None => self
                .http
                .get(endpoints::open_pulls(&self.base_url, &repo_path))
                .query(&[("state", "open")]),
        };
        let request = request.header(ACCEPT, GITHUB_JSON);
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(FetchError::Transport)?;
        let status = response.status();
        tracing::debug!(%status, "received response");

        if !status.is_success() {
            return Err(api_error(status, response.text().await));
        }

        match repo_ref.number {
            Some(_) => {
                let pull = response
                    .json::<PullRequest>()
                    .await
                    .map_err(FetchError::Decode)?;
                Ok(vec![pull])
            }
            None => response
                .json::<Vec<PullRequest>>()
                .await
                .map_err(FetchError::Decode),
        }
    }
}
