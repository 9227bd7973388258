// src/batch/result.rs
// =============================================================================
// The summary of a whole batch.
//
// It starts empty and grows by one outcome each time a clone task finishes.
// Only the scheduler's coordinating loop writes to it, so there is never
// more than one writer.
// =============================================================================

use serde::Serialize;

use crate::clone::CloneOutcome;

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub success_count: usize,
    pub failure_count: usize,
    /// In the order the clones finished, not the order they were submitted
    pub failed_urls: Vec<String>,
    /// Every outcome, also in completion order
    pub outcomes: Vec<CloneOutcome>,
}

impl BatchResult {
    pub fn record(&mut self, outcome: CloneOutcome) {
        if outcome.is_success() {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
            self.failed_urls.push(outcome.url.clone());
        }
        self.outcomes.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }

    /// True when nothing failed (an empty batch counts as success)
    pub fn is_success(&self) -> bool {
        self.failure_count == 0
    }

    /// Failed outcomes sorted by URL, for stable display
    pub fn failures_sorted(&self) -> Vec<&CloneOutcome> {
        let mut failures: Vec<_> = self.outcomes.iter().filter(|o| !o.is_success()).collect();
        failures.sort_by(|a, b| a.url.cmp(&b.url));
        failures
    }
}
