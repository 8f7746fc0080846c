use std::future::Future;
use std::sync::Arc;

use futures::{stream, StreamExt};
use tokio::sync::Semaphore;

/// Bounded pool for upstream detail fetches.
///
/// Clones share the same permits, so the bound holds across every pass that
/// uses the pool, not just within one call.
#[derive(Clone)]
pub struct FetchPool {
    permits: Arc<Semaphore>,
    workers: usize,
}

impl FetchPool {
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `task` for every item and wait until all of them have settled.
    ///
    /// Results come back in completion order.
    pub async fn run_all<T, R, F, Fut>(&self, items: Vec<T>, task: F) -> Vec<R>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = R>,
    {
        stream::iter(items)
            .map(|item| {
                let permits = Arc::clone(&self.permits);
                let fut = task(item);
                async move {
                    // The semaphore is never closed
                    let _permit = permits.acquire_owned().await.ok();
                    fut.await
                }
            })
            .buffer_unordered(self.workers)
            .collect()
            .await
    }
}

impl Default for FetchPool {
    fn default() -> Self {
        Self::new(2)
    }
}
