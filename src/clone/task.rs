// src/clone/task.rs
// =============================================================================
// One clone task: put a single repository at <destination>/<repo name>.
//
// Steps:
// 1. Work out the folder name from the URL
// 2. Delete whatever already sits at that path (no merging, no updating)
// 3. Ask the backend to clone into the now-free path
// 4. Turn the result, good or bad, into a CloneOutcome
//
// A task never returns an error. Every failure becomes a failed outcome so
// the other tasks in the batch keep running.
// =============================================================================

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use super::backend::CloneBackend;
use super::error::CloneError;
use super::outcome::CloneOutcome;
use crate::extract::repo_name;

// Clones one URL into the destination folder
//
// Parameters:
//   backend: what actually performs the clone (git, or a fake in tests)
//   url: repository URL as extracted from the text
//   destination: the folder that holds all cloned repositories
//
// Returns: CloneOutcome for this URL (never an Err)
pub async fn clone_repository<B>(backend: &B, url: &str, destination: &Path) -> CloneOutcome
where
    B: CloneBackend + ?Sized,
{
    match try_clone(backend, url, destination).await {
        Ok(target) => {
            info!(url, path = %target.display(), "cloned");
            CloneOutcome::success(url)
        }
        Err(error) => {
            warn!(url, error = %error, "clone failed");
            CloneOutcome::failure(url, &error)
        }
    }
}

async fn try_clone<B>(backend: &B, url: &str, destination: &Path) -> Result<PathBuf, CloneError>
where
    B: CloneBackend + ?Sized,
{
    let name = repo_name(url)?;
    let target = destination.join(&name);

    remove_existing(&target).await?;

    debug!(url, path = %target.display(), "cloning");
    backend.clone_repo(url, &target).await?;

    Ok(target)
}

// Deletes a file or folder at `target` if there is one
async fn remove_existing(target: &Path) -> Result<(), CloneError> {
    let metadata = match fs::symlink_metadata(target).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => return Err(remove_error(target, source)),
    };

    info!(path = %target.display(), "existing folder found, replacing");

    if !metadata.is_dir() {
        return fs::remove_file(target)
            .await
            .map_err(|source| remove_error(target, source));
    }

    match fs::remove_dir_all(target).await {
        Ok(()) => Ok(()),
        // Git marks its object files read-only, which blocks deletion on
        // Windows. Clear the flag everywhere and try once more.
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            debug!(path = %target.display(), "removal denied, clearing read-only flags");
            clear_readonly(target)
                .await
                .map_err(|source| remove_error(target, source))?;
            fs::remove_dir_all(target)
                .await
                .map_err(|source| remove_error(target, source))
        }
        Err(source) => Err(remove_error(target, source)),
    }
}

fn remove_error(target: &Path, source: io::Error) -> CloneError {
    CloneError::Remove {
        path: target.to_path_buf(),
        source,
    }
}

async fn clear_readonly(path: &Path) -> io::Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || clear_readonly_tree(&path))
        .await
        .map_err(io::Error::other)?
}

fn clear_readonly_tree(path: &Path) -> io::Result<()> {
    let metadata = std::fs::symlink_metadata(path)?;
    if metadata.file_type().is_symlink() {
        return Ok(());
    }

    if metadata.is_dir() {
        for entry in std::fs::read_dir(path)? {
            clear_readonly_tree(&entry?.path())?;
        }
    }

    let mut permissions = metadata.permissions();
    if permissions.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
        std::fs::set_permissions(path, permissions)?;
    }

    Ok(())
}
