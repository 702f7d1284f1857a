//! Bounded worker pool for per-page image batches
//!
//! Each batch spawns one task per item on the tokio runtime; a shared
//! semaphore keeps at most `size` of them running at once across the whole
//! pool. `run_batch` only returns after every task of the batch finished.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Fixed-size pool of concurrent tasks
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Creates a pool running at most `size` tasks at a time (at least one)
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs `task` for every item and waits for all of them
    ///
    /// Results come back in completion order. A task that panics is logged
    /// and left out of the results; the rest of the batch is unaffected.
    pub async fn run_batch<I, F, Fut, T>(&self, items: I, task: F) -> Vec<T>
    where
        I: IntoIterator,
        F: Fn(I::Item) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let mut set = JoinSet::new();

        for item in items {
            let permits = Arc::clone(&self.permits);
            let work = task(item);
            set.spawn(async move {
                // The semaphore is never closed, so acquiring only waits
                let _permit = permits.acquire_owned().await.ok()?;
                Some(work.await)
            });
        }

        let mut results = Vec::with_capacity(set.len());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(Some(value)) => results.push(value),
                Ok(None) => tracing::warn!("Worker pool closed while a task was waiting"),
                Err(e) => tracing::warn!("Worker task failed: {}", e),
            }
        }

        results
    }
}
