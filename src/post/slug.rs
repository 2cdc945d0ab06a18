// src/post/slug.rs
// =============================================================================
// Turns a repository name and a challenge name into a slug that is safe to
// use as a file name and in a URL.
//
// Example:
//   ("Foo!!Bar", "Baz_1") -> "foo-bar-baz-1"
//
// The same inputs always give the same slug, so re-running the tool
// overwrites the same files instead of creating new ones.
// =============================================================================

/// Slug used when the names contain no letters or digits at all
pub const FALLBACK_SLUG: &str = "untitled";

/// Builds the slug for one writeup
pub fn slugify(repo_name: &str, challenge_name: &str) -> String {
    let joined = format!("{}-{}", repo_name, challenge_name).to_lowercase();

    let mut slug = String::with_capacity(joined.len());
    // Start "inside a separator" so a leading run is dropped entirely
    let mut in_separator = true;

    for c in joined.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            in_separator = false;
        } else if !in_separator {
            slug.push('-');
            in_separator = true;
        }
    }

    // A trailing run leaves exactly one '-' behind
    if slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_collapses_runs() {
        assert_eq!(slugify("Foo!!Bar", "Baz_1"), "foo-bar-baz-1");
    }

    #[test]
    fn test_slugify_is_deterministic() {
        assert_eq!(slugify("ctf", "pwn1"), slugify("ctf", "pwn1"));
        assert_eq!(slugify("ctf", "pwn1"), "ctf-pwn1");
    }

    #[test]
    fn test_slugify_trims_separators() {
        assert_eq!(slugify("--picoCTF", "Irish-Name-Repo_1!"), "picoctf-irish-name-repo-1");
        assert_eq!(slugify("repo", "  spaced out  "), "repo-spaced-out");
    }

    #[test]
    fn test_slugify_non_ascii_is_a_separator() {
        assert_eq!(slugify("ctf", "café"), "ctf-caf");
    }

    #[test]
    fn test_slugify_without_alphanumerics() {
        assert_eq!(slugify("!!!", "___"), FALLBACK_SLUG);
        assert_eq!(slugify("", ""), FALLBACK_SLUG);
    }
}
