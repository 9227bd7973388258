// src/extract/naming.rs
// =============================================================================
// Derives the local folder name for a repository URL.
//
//   https://github.com/owner/repo.git  -> repo
//   https://github.com/owner/repo/     -> repo
//   https://github.com/owner/repo      -> repo
//
// Names are not unique across owners: owner-a/tools and owner-b/tools both
// land in "tools", and whichever clone finishes last wins.
// =============================================================================

use std::collections::BTreeMap;
use std::path::{Component, Path};

use crate::clone::CloneError;

// Returns the folder name for a URL, or MalformedUrl if the name is not a
// single plain path component. The clone task deletes the target before
// cloning, so the name must never reach outside the destination.
pub fn repo_name(url: &str) -> Result<String, CloneError> {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let name = trimmed.rsplit('/').next().unwrap_or_default();

    if !is_plain_folder_name(name) {
        return Err(CloneError::MalformedUrl {
            url: url.to_string(),
        });
    }

    Ok(name.to_string())
}

// `\` and `:` are separators or drive prefixes on Windows even though they
// are ordinary characters elsewhere.
fn is_plain_folder_name(name: &str) -> bool {
    if name.contains(['\\', ':']) {
        return false;
    }

    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

// Groups URLs that would be cloned into the same folder
//
// Returns: (folder name, URLs) for every name shared by two or more URLs.
// Malformed URLs are skipped; they fail on their own later.
pub fn find_name_collisions<'a, I>(urls: I) -> Vec<(String, Vec<&'a str>)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut by_name: BTreeMap<String, Vec<&'a str>> = BTreeMap::new();
    for url in urls {
        if let Ok(name) = repo_name(url) {
            by_name.entry(name).or_default().push(url);
        }
    }

    by_name
        .into_iter()
        .filter(|(_, urls)| urls.len() > 1)
        .collect()
}
