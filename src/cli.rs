// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every flag is optional. Running `writeup-sync` with no arguments reads
// writeups-config.json from the current directory and writes into
// blogs/writeups/ and blogs/_includes/.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

use crate::post::DEFAULT_INCLUDE_PREFIX;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "writeup-sync",
    version,
    about = "Turns CTF writeups stored on GitHub into Quarto blog posts",
    long_about = "writeup-sync reads a list of GitHub repositories, finds every solution.md in them, \
                  and writes a Quarto post plus an included markdown file for each writeup. \
                  Existing files are overwritten, so it is safe to run again at any time."
)]
pub struct Cli {
    /// Config file listing the repositories and difficulty levels
    #[arg(long, default_value = "writeups-config.json")]
    pub config: PathBuf,

    /// Directory for the generated .qmd posts
    #[arg(long, default_value = "blogs/writeups")]
    pub output_dir: PathBuf,

    /// Directory for the fetched writeup content
    #[arg(long, default_value = "blogs/_includes")]
    pub includes_dir: PathBuf,

    /// Includes directory as seen from a post (used in the include shortcode)
    #[arg(long, default_value = DEFAULT_INCLUDE_PREFIX)]
    pub include_prefix: String,

    /// Show more log output (-v for info, -vv for debug)
    ///
    /// RUST_LOG overrides this when set
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
