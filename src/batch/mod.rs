// src/batch/mod.rs
// =============================================================================
// This module runs many clone tasks at once and collects their outcomes.
//
// Submodules:
// - scheduler: Bounded worker pool that fans URLs out to clone tasks
// - result: The summary (counts + failed URLs) built as tasks finish
// =============================================================================

mod result;
mod scheduler;

pub use result::BatchResult;
pub use scheduler::BatchScheduler;
