// src/clone/error.rs
// =============================================================================
// Errors that can happen while cloning one repository.
//
// None of these ever leave a clone task: the task converts them into a
// failed CloneOutcome so the rest of the batch keeps going.
// =============================================================================

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::backend::BackendError;
use super::outcome::FailureKind;

#[derive(Error, Debug)]
pub enum CloneError {
    /// The URL has no usable folder name (e.g. nothing left after stripping ".git")
    #[error("cannot derive a folder name from '{url}'")]
    MalformedUrl { url: String },

    /// An existing folder was in the way and could not be deleted
    #[error("could not remove existing folder {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// git itself failed: repository not found, auth required, network down...
    #[error("git clone failed: {0}")]
    Clone(#[from] BackendError),

    /// Anything else, including a clone task that panicked
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl CloneError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CloneError::MalformedUrl { .. } => FailureKind::MalformedUrl,
            CloneError::Remove { .. } => FailureKind::Remove,
            CloneError::Clone(_) => FailureKind::Clone,
            CloneError::Unexpected(_) => FailureKind::Unexpected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let malformed = CloneError::MalformedUrl { url: "x".to_string() };
        assert_eq!(malformed.kind(), FailureKind::MalformedUrl);

        let remove = CloneError::Remove {
            path: PathBuf::from("AddOns/one"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(remove.kind(), FailureKind::Remove);
        assert!(remove.to_string().starts_with("could not remove existing folder"));

        let clone = CloneError::from(BackendError::Command {
            code: Some(128),
            detail: "fatal: repository not found".to_string(),
        });
        assert_eq!(clone.kind(), FailureKind::Clone);
        assert!(clone.to_string().contains("repository not found"));
    }
}
