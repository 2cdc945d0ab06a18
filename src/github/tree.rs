// src/github/tree.rs
// =============================================================================
// The recursive file tree GitHub returns for a repository, and the filter
// that picks the writeups out of it.
//
// GitHub's response looks like:
//   { "sha": "...", "tree": [ { "path": "web/login/solution.md",
//                               "type": "blob", "sha": "..." }, ... ],
//     "truncated": false }
//
// A writeup is any blob whose path ends with "solution.md". The folder it
// lives in is the challenge name: "web/login/solution.md" -> "login".
// =============================================================================

use serde::Deserialize;

/// Filename suffix that marks a writeup
pub const SOLUTION_MARKER: &str = "solution.md";

/// Challenge name used when solution.md sits at the repository root
pub const ROOT_CHALLENGE: &str = "root";

/// What kind of object a tree entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A file
    Blob,
    /// A directory
    Tree,
    /// Submodules ("commit") and anything GitHub adds later
    #[serde(other)]
    Other,
}

/// One entry of the tree listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub sha: Option<String>,
}

/// Body of GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1
#[derive(Debug, Clone, Deserialize)]
pub struct TreeListing {
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    /// GitHub stops listing very large trees and sets this flag
    #[serde(default)]
    pub truncated: bool,
}

/// A tree listing together with the branch that produced it
#[derive(Debug, Clone)]
pub struct RepoTree {
    pub branch: String,
    pub entries: Vec<TreeEntry>,
    pub truncated: bool,
}

/// A writeup found in a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionReference {
    /// Full repository-relative path to solution.md
    pub path: String,
    pub challenge_name: String,
    /// Informational only
    pub sha: Option<String>,
}

impl SolutionReference {
    /// Directory holding the writeup ("" for the repository root)
    pub fn directory(&self) -> &str {
        match self.path.rfind('/') {
            Some(index) => &self.path[..index],
            None => "",
        }
    }
}

/// Picks every solution.md file out of a tree listing, keeping tree order
pub fn find_solutions(entries: &[TreeEntry]) -> Vec<SolutionReference> {
    entries
        .iter()
        .filter(|entry| entry.kind == EntryKind::Blob && entry.path.ends_with(SOLUTION_MARKER))
        .map(|entry| SolutionReference {
            path: entry.path.clone(),
            challenge_name: challenge_name(&entry.path),
            sha: entry.sha.clone(),
        })
        .collect()
}

// "a/b/solution.md" -> "b", "solution.md" -> "root"
fn challenge_name(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() > 1 {
        segments[segments.len() - 2].to_string()
    } else {
        ROOT_CHALLENGE.to_string()
    }
}
