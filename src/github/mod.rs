// src/github/mod.rs
// =============================================================================
// This module handles everything that talks to GitHub.
//
// Submodules:
// - client: HTTP requests for tree listings and raw file contents
// - fallback: trying "main", "master", ... until one branch works
// - tree: the tree listing types and the solution.md filter
// =============================================================================

mod client;
mod fallback;
mod tree;

// Re-export the public API so callers can write `github::GithubClient`
pub use client::GithubClient;
pub use fallback::BranchCandidates;
pub use tree::{find_solutions, SolutionReference};
