// src/clone/outcome.rs
// =============================================================================
// The result of trying to clone one URL.
//
// Mirrors the JSON shape printed with --json:
//   { "url": "...", "status": "success" }
//   { "url": "...", "status": "failure", "kind": "clone", "reason": "..." }
// =============================================================================

use serde::Serialize;

use super::error::CloneError;

/// Which part of the clone went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MalformedUrl,
    Remove,
    Clone,
    Unexpected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CloneStatus {
    /// The repository is now on disk
    Success,
    /// Nothing usable was cloned; `reason` is meant for humans
    Failure { kind: FailureKind, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloneOutcome {
    /// The URL exactly as it was extracted
    pub url: String,
    #[serde(flatten)]
    pub status: CloneStatus,
}

impl CloneOutcome {
    pub fn success(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: CloneStatus::Success,
        }
    }

    pub fn failure(url: impl Into<String>, error: &CloneError) -> Self {
        Self {
            url: url.into(),
            status: CloneStatus::Failure {
                kind: error.kind(),
                reason: error.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, CloneStatus::Success)
    }

    pub fn reason(&self) -> Option<&str> {
        match &self.status {
            CloneStatus::Success => None,
            CloneStatus::Failure { reason, .. } => Some(reason),
        }
    }
}
