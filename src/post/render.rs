// src/post/render.rs
// =============================================================================
// Renders the two files we write for every writeup:
//
// 1. The Quarto post (<slug>.qmd): YAML front matter + a small page that
//    pulls the writeup in with {{< include .../<slug>.md >}}
// 2. The included content (<slug>.md): either the writeup text itself, or a
//    placeholder linking to GitHub when the download failed
//
// Rendering is pure. Everything that changes between runs (today's date,
// the branch that answered) is passed in through RenderContext, so the same
// inputs always produce the same bytes.
// =============================================================================

use chrono::NaiveDate;

use super::slug::slugify;
use crate::config::{RepositoryConfig, WriteupsConfig};
use crate::error::Result;
use crate::github::SolutionReference;

/// Default location of the includes directory, relative to a post
pub const DEFAULT_INCLUDE_PREFIX: &str = "../../_includes";

/// Values a rendered post depends on besides the config
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    /// Generation date shown in the front matter
    pub date: NaiveDate,
    /// Branch the tree listing came from, used in GitHub links
    pub branch: &'a str,
    /// Path prefix of the include shortcode
    pub include_prefix: &'a str,
}

/// What goes into <slug>.md
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludedContent {
    /// The writeup text, sanitized
    Fetched(String),
    /// A link to the original file
    Placeholder(String),
}

impl IncludedContent {
    /// Builds the include from the result of a raw fetch
    ///
    /// A download that came back blank counts as a failed one.
    pub fn from_fetch(
        raw: Option<String>,
        repo: &RepositoryConfig,
        solution: &SolutionReference,
        branch: &str,
    ) -> Self {
        match raw {
            Some(text) if !text.trim().is_empty() => {
                IncludedContent::Fetched(sanitize_content(&text))
            }
            _ => IncludedContent::Placeholder(render_placeholder(repo, solution, branch)),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, IncludedContent::Placeholder(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            IncludedContent::Fetched(text) | IncludedContent::Placeholder(text) => text,
        }
    }
}

/// Renders the Quarto post for one writeup
///
/// Fails only if the repository's difficulty key is missing from the table.
pub fn render_post(
    config: &WriteupsConfig,
    repo: &RepositoryConfig,
    solution: &SolutionReference,
    ctx: &RenderContext<'_>,
) -> Result<String> {
    let difficulty = config.difficulty_for(repo)?;
    let slug = slugify(&repo.name, &solution.challenge_name);
    let repo_url = repo.html_url();
    let challenge_url = challenge_url(repo, solution, ctx.branch);

    // Lines ending in two spaces are markdown hard line breaks
    Ok(format!(
        r#"---
title: "{title}"
description: "Writeup from {display_name_yaml}"
author: "{author}"
date: "{date}"
categories: ["{category_yaml}", "{label_yaml}"]
difficulty: "{difficulty_key}"
repo: "{repo_name}"
challenge-url: "{challenge_url}"
image: "https://opengraph.githubassets.com/1/{owner}/{repo_name}"
---

::: {{.callout-note}}
## Challenge Info
**Repository:** [{display_name}]({repo_url}) {icon}  
**Difficulty:** <span style="color: {color}; font-weight: bold;">{label}</span>  
**Category:** {category}  
**View on GitHub:** [Challenge Files]({challenge_url})
:::

## Solution

{{{{< include {include_prefix}/{slug}.md >}}}}

::: {{.callout-tip collapse="true"}}
## View Full Repository
Check out more challenges from this repository: [{display_name}]({repo_url})

{description}
:::
"#,
        title = yaml_escape(&display_title(&solution.challenge_name)),
        display_name_yaml = yaml_escape(&repo.display_name),
        author = yaml_escape(config.author_for(repo)),
        date = ctx.date.format("%Y-%m-%d"),
        category_yaml = yaml_escape(&repo.category),
        label_yaml = yaml_escape(&difficulty.label),
        category = repo.category,
        label = difficulty.label,
        difficulty_key = yaml_escape(&repo.difficulty),
        repo_name = repo.name,
        challenge_url = challenge_url,
        owner = repo.owner,
        display_name = repo.display_name,
        repo_url = repo_url,
        icon = repo.icon,
        color = difficulty.color,
        include_prefix = ctx.include_prefix.trim_end_matches('/'),
        slug = slug,
        description = repo.description,
    ))
}

/// Replaces ``` with ~~~ so the writeup can't close the page's code fences
pub fn sanitize_content(raw: &str) -> String {
    raw.replace("```", "~~~")
}

/// Include written when the writeup itself could not be downloaded
pub fn render_placeholder(
    repo: &RepositoryConfig,
    solution: &SolutionReference,
    branch: &str,
) -> String {
    format!(
        "This writeup is available on GitHub at:\n\
         [View original solution.md ↗]({}/blob/{}/{})\n\
         \n\
         **Note:** Content could not be automatically fetched. Please visit the link above.\n",
        repo.html_url(),
        branch,
        solution.path,
    )
}

/// "cache-it_to-win" -> "Cache It To Win"
///
/// A letter is uppercased when it follows anything that isn't a letter
/// (space, digit, punctuation), and lowercased otherwise: "2password" ->
/// "2Password".
pub fn display_title(challenge_name: &str) -> String {
    let spaced = challenge_name.replace(['-', '_'], " ");
    let mut title = String::with_capacity(spaced.len());
    let mut after_letter = false;

    for c in spaced.chars() {
        if c.is_alphabetic() {
            if after_letter {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            title.push(c);
            after_letter = false;
        }
    }

    title
}

fn challenge_url(repo: &RepositoryConfig, solution: &SolutionReference, branch: &str) -> String {
    let directory = solution.directory();
    if directory.is_empty() {
        format!("{}/tree/{}", repo.html_url(), branch)
    } else {
        format!("{}/tree/{}/{}", repo.html_url(), branch, directory)
    }
}

// Escapes text for a double-quoted YAML scalar
fn yaml_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config() -> WriteupsConfig {
        WriteupsConfig::from_json(
            Path::new("test.json"),
            r##"{
                "repositories": [{
                    "owner": "acme",
                    "name": "ctf",
                    "displayName": "ACME CTF",
                    "description": "Qualifier solutions",
                    "category": "web",
                    "difficulty": "easy",
                    "icon": "🔥"
                }],
                "difficulties": { "easy": { "label": "Easy", "color": "#0f0" } }
            }"##,
        )
        .unwrap()
    }

    fn solution(path: &str, challenge: &str) -> SolutionReference {
        SolutionReference {
            path: path.to_string(),
            challenge_name: challenge.to_string(),
            sha: None,
        }
    }

    fn ctx() -> RenderContext<'static> {
        RenderContext {
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            branch: "main",
            include_prefix: DEFAULT_INCLUDE_PREFIX,
        }
    }

    #[test]
    fn test_render_post_front_matter() {
        let config = config();
        let repo = &config.repositories[0];
        let post = render_post(&config, repo, &solution("pwn1/solution.md", "pwn1"), &ctx()).unwrap();

        assert!(post.starts_with("---\ntitle: \"Pwn1\"\n"));
        assert!(post.contains("description: \"Writeup from ACME CTF\"\n"));
        assert!(post.contains("author: \"acme\"\n"));
        assert!(post.contains("date: \"2024-03-09\"\n"));
        assert!(post.contains("categories: [\"web\", \"Easy\"]\n"));
        assert!(post.contains("difficulty: \"easy\"\n"));
        assert!(post.contains("repo: \"ctf\"\n"));
        assert!(post.contains("challenge-url: \"https://github.com/acme/ctf/tree/main/pwn1\"\n"));
        assert!(post.contains("image: \"https://opengraph.githubassets.com/1/acme/ctf\"\n"));
    }

    #[test]
    fn test_render_post_body() {
        let config = config();
        let repo = &config.repositories[0];
        let post = render_post(&config, repo, &solution("pwn1/solution.md", "pwn1"), &ctx()).unwrap();

        assert!(post.contains("{{< include ../../_includes/ctf-pwn1.md >}}"));
        assert!(post.contains("**Repository:** [ACME CTF](https://github.com/acme/ctf) 🔥  \n"));
        assert!(post.contains("<span style=\"color: #0f0; font-weight: bold;\">Easy</span>"));
        assert!(post.contains("::: {.callout-tip collapse=\"true\"}"));
        assert!(post.contains("Qualifier solutions\n:::\n"));
    }

    #[test]
    fn test_render_post_is_pure() {
        let config = config();
        let repo = &config.repositories[0];
        let solution = solution("web/login/solution.md", "login");

        let first = render_post(&config, repo, &solution, &ctx()).unwrap();
        let second = render_post(&config, repo, &solution, &ctx()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_post_unknown_difficulty() {
        let config = config();
        let mut repo = config.repositories[0].clone();
        repo.difficulty = "nightmare".to_string();

        let result = render_post(&config, &repo, &solution("a/solution.md", "a"), &ctx());
        assert!(result.is_err());
    }

    #[test]
    fn test_root_challenge_url_has_no_directory() {
        let config = config();
        let repo = &config.repositories[0];
        let post = render_post(&config, repo, &solution("solution.md", "root"), &ctx()).unwrap();
        assert!(post.contains("challenge-url: \"https://github.com/acme/ctf/tree/main\"\n"));
    }

    #[test]
    fn test_quotes_in_titles_are_escaped() {
        let config = config();
        let repo = &config.repositories[0];
        let post =
            render_post(&config, repo, &solution("say \"hi\"/solution.md", "say \"hi\""), &ctx())
                .unwrap();
        assert!(post.contains("title: \"Say \\\"Hi\\\"\"\n"));
    }

    #[test]
    fn test_display_title() {
        assert_eq!(display_title("cache-it-to-win-it"), "Cache It To Win It");
        assert_eq!(display_title("Irish-Name-Repo_1"), "Irish Name Repo 1");
        assert_eq!(display_title("SQLiLite"), "Sqlilite");
        assert_eq!(display_title("old-01"), "Old 01");
        assert_eq!(display_title("2password"), "2Password");
        assert_eq!(display_title("01x"), "01X");
    }

    #[test]
    fn test_sanitize_content() {
        let raw = "intro\n```python\nprint(1)\n```\n";
        assert_eq!(sanitize_content(raw), "intro\n~~~python\nprint(1)\n~~~\n");
    }

    #[test]
    fn test_included_content_placeholder() {
        let config = config();
        let repo = &config.repositories[0];
        let solution = solution("pwn1/solution.md", "pwn1");

        let content = IncludedContent::from_fetch(None, repo, &solution, "master");
        assert!(content.is_placeholder());
        assert!(content
            .as_str()
            .contains("(https://github.com/acme/ctf/blob/master/pwn1/solution.md)"));

        let content = IncludedContent::from_fetch(Some("```x```".into()), repo, &solution, "main");
        assert_eq!(content, IncludedContent::Fetched("~~~x~~~".to_string()));
    }

    #[test]
    fn test_blank_download_becomes_placeholder() {
        let config = config();
        let repo = &config.repositories[0];
        let solution = solution("pwn1/solution.md", "pwn1");

        for raw in ["", "  \n\t\n"] {
            let content = IncludedContent::from_fetch(Some(raw.to_string()), repo, &solution, "main");
            assert!(content.is_placeholder());
        }
    }

    #[test]
    fn test_categories_are_quoted() {
        let mut config = config();
        config.repositories[0].category = "web, crypto]".to_string();
        let repo = &config.repositories[0];

        let post = render_post(&config, repo, &solution("a/solution.md", "a"), &ctx()).unwrap();
        assert!(post.contains("categories: [\"web, crypto]\", \"Easy\"]\n"));
    }
}
