// src/sync.rs
// =============================================================================
// Runs the whole job: for every configured repository, list its files, find
// the writeups, and write a post + include for each one.
//
// How it works:
// 1. Create the output and includes directories
// 2. For each repository (one at a time, in config order):
//    a. Look up its difficulty
//    b. Fetch the tree listing (with branch fallback)
//    c. Find every solution.md
//    d. For each writeup: render the post, fetch the content, write both
// 3. Return a RunReport describing what happened
//
// Failure handling:
// - A repository that can't be listed is skipped; the loop continues
// - A single writeup that can't be rendered or written is counted as failed
// - A writeup whose content can't be downloaded gets a placeholder include
// =============================================================================

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::config::{RepositoryConfig, WriteupsConfig};
use crate::error::{Result, WriteupError};
use crate::github::{find_solutions, BranchCandidates, GithubClient, SolutionReference};
use crate::post::{render_post, slugify, IncludedContent, RenderContext};

/// File extension of the generated posts
pub const POST_EXTENSION: &str = "qmd";

/// Where generated files go
#[derive(Debug, Clone)]
pub struct OutputLayout {
    /// Directory for <slug>.qmd
    pub posts_dir: PathBuf,
    /// Directory for <slug>.md
    pub includes_dir: PathBuf,
    /// Path of includes_dir as seen from a post, for the include shortcode
    pub include_prefix: String,
}

impl OutputLayout {
    pub fn post_path(&self, slug: &str) -> PathBuf {
        self.posts_dir.join(format!("{}.{}", slug, POST_EXTENSION))
    }

    pub fn include_path(&self, slug: &str) -> PathBuf {
        self.includes_dir.join(format!("{}.md", slug))
    }
}

/// Result of processing one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryOutcome {
    Processed(RepositorySummary),
    Skipped { display_name: String, reason: String },
}

/// Counts for a repository that was listed successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySummary {
    pub display_name: String,
    /// Writeups whose post and include were written
    pub writeup_count: usize,
    pub difficulty_label: String,
    /// How many of those got a placeholder include
    pub placeholders: usize,
    /// Writeups that could not be rendered or written
    pub failed: usize,
}

/// Everything that happened during a run, in config order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub repositories: Vec<RepositoryOutcome>,
}

impl RunReport {
    pub fn total_writeups(&self) -> usize {
        self.processed().map(|summary| summary.writeup_count).sum()
    }

    pub fn processed(&self) -> impl Iterator<Item = &RepositorySummary> {
        self.repositories.iter().filter_map(|outcome| match outcome {
            RepositoryOutcome::Processed(summary) => Some(summary),
            RepositoryOutcome::Skipped { .. } => None,
        })
    }

    pub fn skipped_count(&self) -> usize {
        self.repositories.len() - self.processed().count()
    }
}

/// Files written for one writeup
#[derive(Debug, Clone)]
struct WrittenWriteup {
    post_path: PathBuf,
    placeholder: bool,
}

/// Processes every configured repository and returns the run report
///
/// Only fails when the output directories can't be created; everything else
/// is recorded in the report.
pub async fn sync_writeups(
    client: &GithubClient,
    config: &WriteupsConfig,
    layout: &OutputLayout,
    today: NaiveDate,
) -> Result<RunReport> {
    create_dir(&layout.posts_dir).await?;
    create_dir(&layout.includes_dir).await?;

    let mut report = RunReport::default();

    for repo in &config.repositories {
        println!("📦 Processing {}...", repo.display_name);

        let outcome = match sync_repository(client, config, repo, layout, today).await {
            Ok(summary) => RepositoryOutcome::Processed(summary),
            Err(e) => {
                println!("   ✗ Error processing {}: {}", repo.display_name, e);
                tracing::warn!(repo = %repo.name, error = %e, "skipping repository");
                RepositoryOutcome::Skipped {
                    display_name: repo.display_name.clone(),
                    reason: e.to_string(),
                }
            }
        };
        report.repositories.push(outcome);

        println!();
    }

    Ok(report)
}

// Processes one repository. Errors here skip the repository.
async fn sync_repository(
    client: &GithubClient,
    config: &WriteupsConfig,
    repo: &RepositoryConfig,
    layout: &OutputLayout,
    today: NaiveDate,
) -> Result<RepositorySummary> {
    let difficulty = config.difficulty_for(repo)?;

    let tree = client
        .fetch_tree(&repo.owner, &repo.name, &BranchCandidates::for_tree(repo.preferred_branch()))
        .await?;
    let solutions = find_solutions(&tree.entries);

    if tree.truncated {
        println!("   Found {} writeups (listing truncated)", solutions.len());
    } else {
        println!("   Found {} writeups", solutions.len());
    }

    let ctx = RenderContext {
        date: today,
        branch: &tree.branch,
        include_prefix: &layout.include_prefix,
    };
    let raw_branches = BranchCandidates::for_raw(&tree.branch);

    let mut summary = RepositorySummary {
        display_name: repo.display_name.clone(),
        writeup_count: 0,
        difficulty_label: difficulty.label.clone(),
        placeholders: 0,
        failed: 0,
    };

    for solution in &solutions {
        match sync_writeup(client, config, repo, solution, layout, &ctx, &raw_branches).await {
            Ok(written) => {
                summary.writeup_count += 1;
                if written.placeholder {
                    summary.placeholders += 1;
                    println!("   → {} ⚠️ (placeholder)", solution.challenge_name);
                } else {
                    println!("   → {} ✓", solution.challenge_name);
                }
                tracing::debug!(path = %written.post_path.display(), "wrote post");
            }
            Err(e) => {
                summary.failed += 1;
                println!("   → {} ✗", solution.challenge_name);
                tracing::warn!(challenge = %solution.challenge_name, error = %e, "writeup failed");
            }
        }
    }

    Ok(summary)
}

// Renders, fetches, and writes a single writeup
async fn sync_writeup(
    client: &GithubClient,
    config: &WriteupsConfig,
    repo: &RepositoryConfig,
    solution: &SolutionReference,
    layout: &OutputLayout,
    ctx: &RenderContext<'_>,
    raw_branches: &BranchCandidates,
) -> Result<WrittenWriteup> {
    let slug = slugify(&repo.name, &solution.challenge_name);
    tracing::debug!(%slug, path = %solution.path, sha = ?solution.sha, "processing writeup");
    let post_path = layout.post_path(&slug);
    let include_path = layout.include_path(&slug);

    let post = render_post(config, repo, solution, ctx)?;
    write_file(&post_path, &post).await?;

    let raw = client
        .fetch_raw(&repo.owner, &repo.name, &solution.path, raw_branches)
        .await;
    let content = IncludedContent::from_fetch(raw, repo, solution, ctx.branch);
    write_file(&include_path, content.as_str()).await?;

    Ok(WrittenWriteup {
        post_path,
        placeholder: content.is_placeholder(),
    })
}

async fn create_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| WriteupError::io(path, e))
}

// Full overwrite; a previous run's file is simply replaced
async fn write_file(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| WriteupError::io(path, e))
}
