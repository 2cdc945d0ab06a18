// src/github/fallback.rs
// =============================================================================
// Tries a list of branch names in order until one works.
//
// GitHub repositories call their default branch "main" or "master" (or
// something else entirely), and we don't know which in advance. So every
// fetch goes through `first_success`, which:
// 1. Tries each candidate branch in order
// 2. Returns as soon as one attempt succeeds
// 3. Otherwise returns a FallbackError holding EVERY failed attempt
//
// Candidate lists are deduplicated: ["main", "master", "main"] only tries
// "main" once.
// =============================================================================

use std::future::Future;

use crate::error::{BranchAttempt, FallbackError, FetchError};

/// An ordered list of branch names without duplicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCandidates {
    branches: Vec<String>,
}

impl BranchCandidates {
    /// Builds the list, keeping only the first occurrence of each name
    pub fn new<I, S>(branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for branch in branches {
            let branch = branch.into();
            if !branch.is_empty() && !unique.contains(&branch) {
                unique.push(branch);
            }
        }
        Self { branches: unique }
    }

    /// Candidates for the tree listing: the preferred branch, then the usual
    /// default branch names
    pub fn for_tree(preferred: &str) -> Self {
        Self::new([preferred, "master", "main"])
    }

    /// Candidates for raw file downloads: the branch the tree listing came
    /// from, then "main" and "master"
    pub fn for_raw(tree_branch: &str) -> Self {
        Self::new([tree_branch, "main", "master"])
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.branches.iter().map(String::as_str)
    }
}

/// Runs `attempt` for each candidate until one succeeds
///
/// Returns the branch that worked together with its value. Earlier failures
/// are only logged at debug level; they are all kept in the FallbackError if
/// nothing works.
pub async fn first_success<T, F, Fut>(
    candidates: &BranchCandidates,
    mut attempt: F,
) -> Result<(String, T), FallbackError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut failures = Vec::new();

    for branch in candidates.iter() {
        match attempt(branch.to_string()).await {
            Ok(value) => return Ok((branch.to_string(), value)),
            Err(error) => {
                tracing::debug!(branch, %error, "branch attempt failed");
                failures.push(BranchAttempt {
                    branch: branch.to_string(),
                    error,
                });
            }
        }
    }

    Err(FallbackError::new(failures))
}
