// src/clone/backend.rs
// =============================================================================
// The primitive every clone task relies on: "clone this URL into this path".
//
// Production uses GitCli, which runs `git clone` as a child process.
// Tests plug in fake backends through the same trait, so the scheduler can be
// exercised without network access.
//
// Rust concepts:
// - Traits: A shared interface with several implementations
// - async-trait: Lets a trait have async methods whose futures are Send
// - tokio::process: Spawn a child process without blocking the runtime
// =============================================================================

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Errors reported by a clone backend
///
/// `Command` means git ran and refused (bad URL, private repo, network).
/// `Spawn` means git could not be started at all.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{detail} (exit code {})", describe_code(code))]
    Command { code: Option<i32>, detail: String },

    #[error("could not run git: {0}")]
    Spawn(#[source] io::Error),
}

// Killed-by-signal exits have no code
fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

#[async_trait]
pub trait CloneBackend: Send + Sync {
    /// Clones `url` into `target`. `target` does not exist when this is called.
    async fn clone_repo(&self, url: &str, target: &Path) -> Result<(), BackendError>;
}

/// Clones with the `git` executable found on PATH
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
}

impl GitCli {
    /// Uses a specific git executable instead of the one on PATH
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::with_program("git")
    }
}

#[async_trait]
impl CloneBackend for GitCli {
    async fn clone_repo(&self, url: &str, target: &Path) -> Result<(), BackendError> {
        // GIT_TERMINAL_PROMPT=0 makes git fail instead of asking for a
        // username when a repository is private or missing.
        let output = Command::new(&self.program)
            .arg("clone")
            .arg("--quiet")
            .arg("--")
            .arg(url)
            .arg(target)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(BackendError::Spawn)?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = match stderr.trim() {
            "" => "git exited without an error message".to_string(),
            message => message.to_string(),
        };

        Err(BackendError::Command {
            code: output.status.code(),
            detail,
        })
    }
}
