// src/config.rs
// =============================================================================
// Loads writeups-config.json: the list of GitHub repositories to pull
// writeups from, and the difficulty table shared by all of them.
//
// Example document:
//   {
//     "author": "Jane Doe",
//     "repositories": [
//       { "owner": "acme", "name": "ctf", "displayName": "ACME CTF",
//         "description": "...", "category": "web", "difficulty": "easy",
//         "icon": "🔥" }
//     ],
//     "difficulties": { "easy": { "label": "Easy", "color": "#0f0" } }
//   }
//
// Everything is read once at startup and never changes afterwards.
// =============================================================================

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Result, WriteupError};

/// Branch tried first for the tree listing when a repository doesn't set one
pub const DEFAULT_BRANCH: &str = "main";

/// One GitHub repository that holds writeups
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConfig {
    pub owner: String,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub category: String,
    /// Key into `WriteupsConfig::difficulties`
    pub difficulty: String,
    pub icon: String,
    /// Preferred branch for the tree listing (defaults to "main")
    #[serde(default)]
    pub branch: Option<String>,
}

impl RepositoryConfig {
    pub fn preferred_branch(&self) -> &str {
        self.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

/// How a difficulty level is displayed
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Difficulty {
    pub label: String,
    /// Any CSS color ("#0f0", "orange", ...)
    pub color: String,
}

/// The whole config document
#[derive(Debug, Clone, Deserialize)]
pub struct WriteupsConfig {
    /// Author shown on every post; falls back to the repository owner
    #[serde(default)]
    pub author: Option<String>,
    pub repositories: Vec<RepositoryConfig>,
    pub difficulties: HashMap<String, Difficulty>,
}

impl WriteupsConfig {
    /// Parses a config document from a JSON string
    pub fn from_json(path: &Path, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| WriteupError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Looks up the difficulty a repository refers to
    pub fn difficulty_for(&self, repo: &RepositoryConfig) -> Result<&Difficulty> {
        self.difficulties
            .get(&repo.difficulty)
            .ok_or_else(|| WriteupError::UnknownDifficulty {
                repo: repo.name.clone(),
                key: repo.difficulty.clone(),
            })
    }

    pub fn author_for<'a>(&'a self, repo: &'a RepositoryConfig) -> &'a str {
        self.author.as_deref().unwrap_or(&repo.owner)
    }
}

/// Reads and parses the config document at `path`
///
/// A missing or malformed file is fatal: without it there is nothing to do.
pub async fn load_config(path: &Path) -> Result<WriteupsConfig> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| WriteupError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

    WriteupsConfig::from_json(path, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "repositories": [
            {
                "owner": "acme",
                "name": "ctf",
                "displayName": "ACME CTF",
                "description": "Solutions to the ACME qualifiers",
                "category": "web",
                "difficulty": "easy",
                "icon": "🔥"
            },
            {
                "owner": "acme",
                "name": "pwn-notes",
                "displayName": "Pwn Notes",
                "description": "Binary exploitation",
                "category": "pwn",
                "difficulty": "insane",
                "icon": "💥",
                "branch": "trunk"
            }
        ],
        "difficulties": {
            "easy": { "label": "Easy", "color": "#0f0" }
        }
    }"##;

    fn sample() -> WriteupsConfig {
        WriteupsConfig::from_json(Path::new("writeups-config.json"), SAMPLE).unwrap()
    }

    #[test]
    fn test_parse_config() {
        let config = sample();
        assert_eq!(config.repositories.len(), 2);

        let first = &config.repositories[0];
        assert_eq!(first.display_name, "ACME CTF");
        assert_eq!(first.icon, "🔥");
        assert_eq!(first.preferred_branch(), "main");
        assert_eq!(first.html_url(), "https://github.com/acme/ctf");

        assert_eq!(config.repositories[1].preferred_branch(), "trunk");
    }

    #[test]
    fn test_difficulty_lookup() {
        let config = sample();
        let easy = config.difficulty_for(&config.repositories[0]).unwrap();
        assert_eq!(easy.label, "Easy");
        assert_eq!(easy.color, "#0f0");

        let err = config.difficulty_for(&config.repositories[1]).unwrap_err();
        assert!(matches!(err, WriteupError::UnknownDifficulty { ref key, .. } if key == "insane"));
    }

    #[test]
    fn test_author_falls_back_to_owner() {
        let mut config = sample();
        assert_eq!(config.author_for(&config.repositories[0]), "acme");

        config.author = Some("Jane Doe".to_string());
        assert_eq!(config.author_for(&config.repositories[0]), "Jane Doe");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let result = WriteupsConfig::from_json(Path::new("bad.json"), "{ \"repositories\": 3 }");
        assert!(matches!(result, Err(WriteupError::ConfigParse { .. })));
    }

    #[tokio::test]
    async fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(&dir.path().join("nope.json")).await;
        assert!(matches!(result, Err(WriteupError::ConfigRead { .. })));
    }

    #[tokio::test]
    async fn test_load_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("writeups-config.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.repositories[0].name, "ctf");
    }
}
