// src/main.rs
// =============================================================================
// This is the entry point of writeup-sync.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr
// 3. Load the config and run the sync over every repository
// 4. Print the summary table and the next steps
// 5. Exit with proper code (0 = all good, 1 = something was skipped,
//    2 = fatal error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - writeups-config.json
mod error; // src/error.rs - error types
mod github; // src/github/ - GitHub API and raw file access
mod post; // src/post/ - slugs and Quarto post rendering
mod sync; // src/sync.rs - the per-repository loop

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use github::GithubClient;
use sync::{OutputLayout, RepositoryOutcome, RunReport};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole cause chain on one line
            eprintln!("❌ Fatal error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every repository and writeup processed
//   Ok(1) = some repositories or writeups were skipped
//   Err   = config or output directories unusable
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    println!("🚀 Fetching writeups from GitHub repositories...\n");

    let config = config::load_config(&cli.config)
        .await
        .with_context(|| format!("loading {}", cli.config.display()))?;

    let client = GithubClient::new()?;
    let layout = OutputLayout {
        posts_dir: cli.output_dir.clone(),
        includes_dir: cli.includes_dir.clone(),
        include_prefix: cli.include_prefix.clone(),
    };

    let today = chrono::Local::now().date_naive();
    let report = sync::sync_writeups(&client, &config, &layout, today).await?;

    print_summary(&report);
    print_next_steps(&layout);

    let failed: usize = report.processed().map(|summary| summary.failed).sum();
    if report.skipped_count() > 0 || failed > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Logs go to stderr so they never mix with the summary on stdout
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match verbose {
        0 => "writeup_sync=warn",
        1 => "writeup_sync=info",
        _ => "writeup_sync=debug",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// Prints one line per repository, then the total
fn print_summary(report: &RunReport) {
    println!("{}", "═".repeat(50));
    println!("✅ SUMMARY");
    println!("{}", "═".repeat(50));

    for outcome in &report.repositories {
        println!("{}", summary_line(outcome));
    }

    println!("{}", "─".repeat(50));
    println!("Total: {} writeups generated", report.total_writeups());
    println!("{}", "═".repeat(50));
    println!();
}

// "ACME CTF                  1 writeups (Easy)"
fn summary_line(outcome: &RepositoryOutcome) -> String {
    match outcome {
        RepositoryOutcome::Processed(summary) => {
            let mut line = format!(
                "{:<25} {} writeups ({})",
                summary.display_name, summary.writeup_count, summary.difficulty_label
            );
            if summary.placeholders > 0 {
                line.push_str(&format!(", {} placeholder(s)", summary.placeholders));
            }
            if summary.failed > 0 {
                line.push_str(&format!(", {} failed", summary.failed));
            }
            line
        }
        RepositoryOutcome::Skipped { display_name, reason } => {
            format!("{:<25} skipped: {}", display_name, reason)
        }
    }
}

fn print_next_steps(layout: &OutputLayout) {
    println!("📝 Next steps:");
    println!("   1. Review generated files in {}/", layout.posts_dir.display());
    println!("   2. Run: quarto render blogs/");
    println!("   3. Visit /blogs/writeups/ on your site");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::RepositorySummary;

    fn processed(placeholders: usize, failed: usize) -> RepositoryOutcome {
        RepositoryOutcome::Processed(RepositorySummary {
            display_name: "ACME CTF".to_string(),
            writeup_count: 1,
            difficulty_label: "Easy".to_string(),
            placeholders,
            failed,
        })
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            summary_line(&processed(0, 0)),
            "ACME CTF                  1 writeups (Easy)"
        );
    }

    #[test]
    fn test_summary_line_with_problems() {
        assert_eq!(
            summary_line(&processed(1, 2)),
            "ACME CTF                  1 writeups (Easy), 1 placeholder(s), 2 failed"
        );
    }

    #[test]
    fn test_summary_line_for_skipped_repository() {
        let outcome = RepositoryOutcome::Skipped {
            display_name: "Deleted Repo".to_string(),
            reason: "could not list files".to_string(),
        };
        assert_eq!(
            summary_line(&outcome),
            "Deleted Repo              skipped: could not list files"
        );
    }
}
