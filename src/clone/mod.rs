// src/clone/mod.rs
// =============================================================================
// This module clones a single repository into the destination folder.
//
// Submodules:
// - backend: The "clone URL into path" primitive (git CLI in production)
// - error: Typed errors a clone can run into
// - outcome: The per-URL result handed back to the scheduler
// - task: One clone, start to finish, with every error turned into an outcome
//
// The scheduler in src/batch/ runs many of these tasks at once.
// =============================================================================

mod backend;
mod error;
mod outcome;
mod task;

pub use backend::{BackendError, CloneBackend, GitCli};
pub use error::CloneError;
pub use outcome::{CloneOutcome, CloneStatus, FailureKind};
pub use task::clone_repository;
