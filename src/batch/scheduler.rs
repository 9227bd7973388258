// src/batch/scheduler.rs
// =============================================================================
// Runs clone tasks for a whole set of URLs with a cap on how many run at once.
//
// How it works:
// 1. Sort and dedupe the URLs so each one is attempted exactly once
// 2. Turn every URL into a future that spawns its clone task when first polled
// 3. buffer_unordered(workers) keeps at most `workers` of those futures alive
// 4. Fold each finished outcome into one BatchResult as it arrives
// 5. Return only after every URL has an outcome
//
// Each clone runs on its own tokio task, so a panic in one clone is caught at
// the JoinHandle and reported as a failure for that URL alone.
//
// Rust concepts:
// - Arc: Share one backend between many tasks
// - tokio::spawn: Run a future on the runtime's thread pool
// - Streams: Process many futures with a concurrency limit
// =============================================================================

use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use super::result::BatchResult;
use crate::clone::{clone_repository, CloneBackend, CloneError, CloneOutcome};
use crate::extract::find_name_collisions;

pub struct BatchScheduler<B: ?Sized> {
    backend: Arc<B>,
    workers: usize,
}

impl<B> BatchScheduler<B>
where
    B: CloneBackend + ?Sized + 'static,
{
    // Creates a scheduler
    //
    // Parameters:
    //   backend: shared by every clone task
    //   workers: maximum number of clones running at the same time (0 acts as 1)
    pub fn new(backend: Arc<B>, workers: usize) -> Self {
        Self {
            backend,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    // Clones every URL into `destination` and waits for all of them
    //
    // Parameters:
    //   urls: repository URLs (duplicates are attempted once)
    //   destination: existing folder that receives one subfolder per repository
    //
    // Returns: BatchResult with exactly one outcome per distinct URL
    pub async fn run<I>(&self, urls: I, destination: &Path) -> BatchResult
    where
        I: IntoIterator<Item = String>,
    {
        let mut urls: Vec<String> = urls.into_iter().collect();
        urls.sort();
        urls.dedup();

        let submitted = urls.len();
        if submitted == 0 {
            return BatchResult::default();
        }

        for (name, colliding) in find_name_collisions(urls.iter().map(String::as_str)) {
            warn!(
                folder = %name,
                urls = ?colliding,
                "several repositories share a folder name; the last clone to finish wins"
            );
        }

        let limit = self.workers.min(submitted);
        info!(
            repositories = submitted,
            workers = limit,
            destination = %destination.display(),
            "starting batch"
        );

        let tasks = urls.into_iter().map(|url| {
            let backend = Arc::clone(&self.backend);
            let destination = destination.to_path_buf();
            async move {
                // Spawning inside the async block means the task only starts
                // once buffer_unordered polls this future.
                let task_url = url.clone();
                let handle = tokio::spawn(async move {
                    clone_repository(backend.as_ref(), &task_url, &destination).await
                });

                match handle.await {
                    Ok(outcome) => outcome,
                    Err(join_error) => {
                        let message = if join_error.is_panic() {
                            format!("clone task panicked: {}", panic_message(join_error.into_panic()))
                        } else {
                            format!("clone task did not finish: {join_error}")
                        };
                        error!(url = %url, "{message}");
                        CloneOutcome::failure(url, &CloneError::Unexpected(message))
                    }
                }
            }
        });

        let result = stream::iter(tasks)
            .buffer_unordered(limit)
            .fold(BatchResult::default(), |mut result, outcome| async move {
                result.record(outcome);
                result
            })
            .await;

        debug_assert_eq!(result.total(), submitted);
        info!(
            succeeded = result.success_count,
            failed = result.failure_count,
            "batch finished"
        );

        result
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does buffer_unordered limit the clones?
//    - stream::iter(tasks) yields futures lazily, one per URL
//    - buffer_unordered(N) only polls N of them at a time
//    - A future that has not been polled has not called tokio::spawn yet
//    - So at most N clone tasks exist at any moment
//
// 2. Why tokio::spawn at all?
//    - A panic inside a plain future would unwind through the whole stream
//    - A spawned task that panics just makes its JoinHandle return Err
//    - We turn that Err into a failed outcome and move on
//
// 3. Why fold instead of a Mutex<BatchResult>?
//    - fold runs on the single coordinating future that drives the stream
//    - Outcomes arrive one at a time, so there is exactly one writer
//    - No lock needed, no shared counters
//
// 4. Why Arc<B>?
//    - Every spawned task needs the backend, and spawned tasks must own
//      their data ('static)
//    - Arc::clone only bumps a reference count
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clone::{BackendError, CloneStatus, FailureKind};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    // Counts how many clones are in flight and remembers the peak
    #[derive(Default)]
    struct InstrumentedBackend {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: Mutex<HashMap<String, usize>>,
        fail_for: Vec<String>,
    }

    impl InstrumentedBackend {
        fn failing_for(urls: &[&str]) -> Self {
            Self {
                fail_for: urls.iter().map(|u| u.to_string()).collect(),
                ..Self::default()
            }
        }

        fn calls_for(&self, url: &str) -> usize {
            self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
        }
    }

    #[async_trait]
    impl CloneBackend for InstrumentedBackend {
        async fn clone_repo(&self, url: &str, target: &Path) -> Result<(), BackendError> {
            *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_for.iter().any(|u| u == url) {
                return Err(BackendError::Command {
                    code: Some(128),
                    detail: format!("fatal: repository '{url}' not found"),
                });
            }

            std::fs::create_dir_all(target).map_err(BackendError::Spawn)
        }
    }

    struct PanickingBackend;

    #[async_trait]
    impl CloneBackend for PanickingBackend {
        async fn clone_repo(&self, url: &str, target: &Path) -> Result<(), BackendError> {
            if url.ends_with("/boom") {
                panic!("backend exploded");
            }
            std::fs::create_dir_all(target).map_err(BackendError::Spawn)
        }
    }

    fn urls(count: usize) -> Vec<String> {
        (0..count)
            .map(|i| format!("https://github.com/owner/repo-{i}"))
            .collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_url_gets_one_outcome() {
        let dest = tempfile::tempdir().unwrap();
        let backend = Arc::new(InstrumentedBackend::default());
        let scheduler = BatchScheduler::new(Arc::clone(&backend), 3);

        let result = scheduler.run(urls(10), dest.path()).await;

        assert_eq!(result.outcomes.len(), 10);
        assert_eq!(result.success_count + result.failure_count, 10);
        assert_eq!(result.success_count, 10);
        for url in urls(10) {
            assert_eq!(backend.calls_for(&url), 1, "{url} should be cloned once");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_worker_cap_is_respected() {
        let dest = tempfile::tempdir().unwrap();
        let backend = Arc::new(InstrumentedBackend::default());
        let scheduler = BatchScheduler::new(Arc::clone(&backend), 3);

        scheduler.run(urls(12), dest.path()).await;

        let peak = backend.peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak concurrency {peak} exceeded the cap");
        assert!(peak >= 2, "clones should overlap, peak was {peak}");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_cap_larger_than_batch() {
        let dest = tempfile::tempdir().unwrap();
        let backend = Arc::new(InstrumentedBackend::default());
        let scheduler = BatchScheduler::new(Arc::clone(&backend), 12);

        let result = scheduler.run(urls(2), dest.path()).await;

        assert_eq!(result.total(), 2);
        assert!(backend.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let dest = tempfile::tempdir().unwrap();
        let bad = "https://github.com/owner/repo-2";
        let backend = Arc::new(InstrumentedBackend::failing_for(&[bad]));
        let scheduler = BatchScheduler::new(backend, 2);

        let result = scheduler.run(urls(5), dest.path()).await;

        assert_eq!(result.success_count, 4);
        assert_eq!(result.failure_count, 1);
        assert_eq!(result.failed_urls, vec![bad]);
        for outcome in &result.outcomes {
            assert_eq!(outcome.is_success(), outcome.url != bad);
        }
        assert!(dest.path().join("repo-4").exists());
    }

    #[tokio::test]
    async fn test_duplicates_are_cloned_once() {
        let dest = tempfile::tempdir().unwrap();
        let backend = Arc::new(InstrumentedBackend::default());
        let scheduler = BatchScheduler::new(Arc::clone(&backend), 4);

        let text = "https://github.com/x/one https://github.com/x/two https://github.com/x/one";
        let extracted = crate::extract::extract_github_urls(text);
        assert_eq!(extracted.len(), 2);

        let result = scheduler.run(extracted, dest.path()).await;

        assert_eq!(result.total(), 2);
        assert_eq!(backend.calls_for("https://github.com/x/one"), 1);
        assert_eq!(backend.calls_for("https://github.com/x/two"), 1);
    }

    #[tokio::test]
    async fn test_panicking_task_becomes_failure() {
        let dest = tempfile::tempdir().unwrap();
        let scheduler = BatchScheduler::new(Arc::new(PanickingBackend), 2);

        let result = scheduler
            .run(
                vec![
                    "https://github.com/x/boom".to_string(),
                    "https://github.com/x/fine".to_string(),
                ],
                dest.path(),
            )
            .await;

        assert_eq!(result.success_count, 1);
        assert_eq!(result.failed_urls, vec!["https://github.com/x/boom"]);
        let failure = result
            .outcomes
            .iter()
            .find(|o| o.url.ends_with("/boom"))
            .unwrap();
        match &failure.status {
            CloneStatus::Failure { kind, reason } => {
                assert_eq!(*kind, FailureKind::Unexpected);
                assert!(reason.contains("backend exploded"));
            }
            CloneStatus::Success => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_malformed_url_does_not_abort_batch() {
        let dest = tempfile::tempdir().unwrap();
        let scheduler = BatchScheduler::new(Arc::new(InstrumentedBackend::default()), 2);

        let result = scheduler
            .run(
                vec![
                    "https://github.com/x/..".to_string(),
                    "https://github.com/x/good".to_string(),
                ],
                dest.path(),
            )
            .await;

        assert_eq!(result.success_count, 1);
        assert_eq!(result.failed_urls, vec!["https://github.com/x/.."]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let dest = tempfile::tempdir().unwrap();
        let scheduler = BatchScheduler::new(Arc::new(InstrumentedBackend::default()), 4);

        let result = scheduler.run(Vec::new(), dest.path()).await;

        assert_eq!(result.total(), 0);
        assert!(result.is_success());
    }

    #[test]
    fn test_zero_workers_becomes_one() {
        let scheduler = BatchScheduler::new(Arc::new(InstrumentedBackend::default()), 0);
        assert_eq!(scheduler.workers(), 1);
    }

    #[tokio::test]
    async fn test_trait_object_backend() {
        let dest = tempfile::tempdir().unwrap();
        let backend: Arc<dyn CloneBackend> = Arc::new(InstrumentedBackend::default());
        let scheduler = BatchScheduler::new(backend, 2);

        let result = scheduler.run(urls(3), dest.path()).await;

        assert_eq!(result.success_count, 3);
    }
}
