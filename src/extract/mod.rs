// src/extract/mod.rs
// =============================================================================
// This module turns pasted text into the list of repositories we will clone.
//
// Submodules:
// - github: Finds GitHub repository URLs inside free-form text
// - naming: Derives the local folder name for a repository URL
//
// Both are pure functions: no network, no filesystem.
// =============================================================================

mod github;
mod naming;

pub use github::extract_github_urls;
pub use naming::{find_name_collisions, repo_name};
