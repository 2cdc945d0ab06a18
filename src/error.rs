// src/error.rs
// =============================================================================
// Error types used throughout writeup-sync.
//
// There are three layers:
// - FetchError: one HTTP request against one branch failed
// - FallbackError: every candidate branch failed (holds ALL the attempts)
// - WriteupError: anything that stops a repository, a writeup, or the run
//
// main.rs wraps these in anyhow for the final "Error: ..." message.
// =============================================================================

use std::fmt;
use std::path::PathBuf;

use reqwest::StatusCode;

/// A single failed HTTP attempt.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, TLS, timeout, ...)
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    /// The response body could not be read or decoded
    #[error("could not read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint URL could not be built from its base
    #[error("invalid endpoint {0}")]
    Endpoint(String),
}

/// One branch we tried, and why it did not work.
#[derive(Debug)]
pub struct BranchAttempt {
    pub branch: String,
    pub error: FetchError,
}

impl fmt::Display for BranchAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.branch, self.error)
    }
}

/// Every candidate branch failed.
///
/// Display lists every attempt in order; `source()` is the last attempt, so
/// anyhow's "Caused by" chain ends at the final underlying error.
#[derive(Debug)]
pub struct FallbackError {
    pub attempts: Vec<BranchAttempt>,
}

impl FallbackError {
    pub fn new(attempts: Vec<BranchAttempt>) -> Self {
        Self { attempts }
    }

    /// Names of the branches that were tried, in order
    pub fn branches(&self) -> Vec<&str> {
        self.attempts.iter().map(|a| a.branch.as_str()).collect()
    }
}

impl fmt::Display for FallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attempts.is_empty() {
            return write!(f, "no candidate branches to try");
        }
        let tried: Vec<String> = self.attempts.iter().map(|a| a.to_string()).collect();
        write!(f, "no branch succeeded [{}]", tried.join("; "))
    }
}

impl std::error::Error for FallbackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.attempts
            .last()
            .map(|attempt| &attempt.error as &(dyn std::error::Error + 'static))
    }
}

/// Top-level error type for writeup-sync operations.
#[derive(Debug, thiserror::Error)]
pub enum WriteupError {
    /// Config document missing or unreadable
    #[error("could not read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config document is not valid JSON or has the wrong shape
    #[error("could not parse config {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The tree listing could not be fetched from any branch
    #[error("could not list files of {owner}/{repo}: {source}")]
    TreeFetch {
        owner: String,
        repo: String,
        #[source]
        source: FallbackError,
    },

    /// The HTTP client could not be constructed
    #[error("could not build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// A configured base URL does not parse
    #[error("invalid base URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A repository refers to a difficulty key that is not in the table
    #[error("repository {repo} uses unknown difficulty {key:?}")]
    UnknownDifficulty { repo: String, key: String },

    /// Filesystem error, with the path we were working on
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WriteupError>;

impl WriteupError {
    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
