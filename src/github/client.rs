// src/github/client.rs
// =============================================================================
// Talks to GitHub over HTTP.
//
// Two endpoints are used:
// - api.github.com: the recursive tree listing of a repository
//   GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1
// - raw.githubusercontent.com: the raw text of a single file
//   GET /{owner}/{repo}/{branch}/{path}
//
// Both go through the branch fallback in fallback.rs, because we don't know
// whether a repository uses "main", "master", or something else.
//
// The base URLs are stored in the client so tests can point them at a local
// mock server instead of the real GitHub.
// =============================================================================

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use url::Url;

use super::fallback::{first_success, BranchCandidates};
use super::tree::{RepoTree, TreeListing};
use crate::error::{FetchError, Result, WriteupError};

pub const GITHUB_API: &str = "https://api.github.com/";
pub const GITHUB_RAW: &str = "https://raw.githubusercontent.com/";

// GitHub asks API clients to send this
const API_ACCEPT: &str = "application/vnd.github.v3+json";
const RAW_ACCEPT: &str = "text/plain, */*";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the GitHub API and raw file host
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    api_base: Url,
    raw_base: Url,
}

impl GithubClient {
    /// Client for the real GitHub
    pub fn new() -> Result<Self> {
        Self::with_base_urls(GITHUB_API, GITHUB_RAW)
    }

    /// Client for any GitHub-compatible host (used by tests with wiremock)
    pub fn with_base_urls(api_base: &str, raw_base: &str) -> Result<Self> {
        // One client for the whole run so connections get reused
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(WriteupError::HttpClient)?;

        Ok(Self {
            http,
            api_base: parse_base(api_base)?,
            raw_base: parse_base(raw_base)?,
        })
    }

    /// Fetches the full recursive file tree of `owner/repo`
    ///
    /// Tries each candidate branch in order and returns the first listing
    /// that comes back. If none does, the error lists every attempt.
    pub async fn fetch_tree(
        &self,
        owner: &str,
        repo: &str,
        candidates: &BranchCandidates,
    ) -> Result<RepoTree> {
        let (branch, listing) =
            first_success(candidates, |branch| self.get_tree(owner, repo, branch))
                .await
                .map_err(|source| WriteupError::TreeFetch {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                    source,
                })?;

        if listing.truncated {
            tracing::warn!(owner, repo, %branch, "tree listing was truncated by GitHub, some writeups may be missing");
        }

        Ok(RepoTree {
            branch,
            entries: listing.tree,
            truncated: listing.truncated,
        })
    }

    /// Fetches the raw text of `path` in `owner/repo`
    ///
    /// Returns None (after logging a warning) when no candidate branch has
    /// the file. Never fails: the caller writes a placeholder instead.
    pub async fn fetch_raw(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        candidates: &BranchCandidates,
    ) -> Option<String> {
        match first_success(candidates, |branch| self.get_raw(owner, repo, path, branch)).await {
            Ok((_branch, content)) => Some(content),
            Err(error) => {
                tracing::warn!(path, branches = ?error.branches(), %error, "could not fetch writeup content");
                None
            }
        }
    }

    // One attempt at the tree listing for a single branch
    async fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        branch: String,
    ) -> std::result::Result<TreeListing, FetchError> {
        let mut url = endpoint(
            &self.api_base,
            ["repos", owner, repo, "git", "trees", branch.as_str()],
        )?;
        url.query_pairs_mut().append_pair("recursive", "1");

        let response = self.get(&url, API_ACCEPT).await?;
        response
            .json::<TreeListing>()
            .await
            .map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            })
    }

    // One attempt at a raw file for a single branch
    async fn get_raw(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: String,
    ) -> std::result::Result<String, FetchError> {
        let segments = [owner, repo, branch.as_str()]
            .into_iter()
            .chain(path.split('/').filter(|segment| !segment.is_empty()));
        let url = endpoint(&self.raw_base, segments)?;

        let response = self.get(&url, RAW_ACCEPT).await?;
        response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }

    // Sends a GET and turns non-2xx statuses into errors
    async fn get(&self, url: &Url, accept: &str) -> std::result::Result<Response, FetchError> {
        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        Ok(response)
    }
}

fn parse_base(base: &str) -> Result<Url> {
    Url::parse(base).map_err(|source| WriteupError::InvalidUrl {
        url: base.to_string(),
        source,
    })
}

// Appends path segments to a base URL, percent-encoding each one
// (so "My Challenge/solution.md" becomes "My%20Challenge/solution.md")
fn endpoint<'a>(
    base: &Url,
    segments: impl IntoIterator<Item = &'a str>,
) -> std::result::Result<Url, FetchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| FetchError::Endpoint(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
