// src/extract/github.rs
// =============================================================================
// This module finds GitHub repository URLs in arbitrary text.
//
// Supported shapes (anywhere in a line, mixed with other data):
// - https://github.com/owner/repo
// - https://github.com/owner/repo.git
// - http://github.com/owner/repo
// - "https://github.com/owner/repo"   (quoted)
// - [name](https://github.com/owner/repo)   (markdown link)
//
// Not matched:
// - github.com/owner/repo   (no scheme)
// - https://github.com/owner   (only one path segment)
//
// Rust concepts:
// - LazyLock: Compile the regex once, on first use
// - BTreeSet: A sorted set, so duplicates collapse and order is stable
// =============================================================================

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

// The repository segment stops at whitespace, a quote or a closing
// parenthesis. A trailing ".git" is part of the match.
static GITHUB_REPO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://github\.com/[^\s/]+/[^\s)"']+"#)
        .expect("GitHub URL pattern is valid")
});

// Extracts every distinct GitHub repository URL from the text
//
// Parameters:
//   text: the pasted text (borrowed, we only read it)
//
// Returns: BTreeSet<String> of unique URLs, sorted
//
// Example:
//   "see https://github.com/x/one and https://github.com/x/one"
//   -> {"https://github.com/x/one"}
pub fn extract_github_urls(text: &str) -> BTreeSet<String> {
    GITHUB_REPO_RE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a static regex?
//    - Compiling a regex is expensive compared to running it
//    - LazyLock builds it the first time it is used, then reuses it
//    - The expect() only fires if the pattern itself is broken (programmer error)
//
// 2. What does (?i) do?
//    - Turns on case-insensitive matching for the whole pattern
//    - So HTTPS://GitHub.com/owner/repo is found too
//
// 3. Why BTreeSet instead of HashSet?
//    - Both remove duplicates
//    - BTreeSet also keeps items sorted, so printing it is deterministic
//
// 4. What is find_iter?
//    - Returns an iterator over every non-overlapping match in the text
//    - m.as_str() borrows the matched slice from the original text
// -----------------------------------------------------------------------------
