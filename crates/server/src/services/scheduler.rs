mod movie_sync_job;
mod traits;

pub use movie_sync_job::MovieSyncJob;
pub use traits::{JobResult, SchedulerJob};

use std::sync::Arc;

/// Scheduler service that manages periodic background tasks.
///
/// The scheduler runs registered jobs at their specified intervals.
/// Each job runs independently in its own tokio task.
///
/// # Example
///
/// ```rust,ignore
/// let scheduler = SchedulerService::new()
///     .with_job(MovieSyncJob::new(movies, interval));
///
/// scheduler.start();
/// ```
pub struct SchedulerService {
    jobs: Vec<Arc<dyn SchedulerJob>>,
}

impl SchedulerService {
    /// Creates a new scheduler service with no jobs.
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Adds a job to the scheduler.
    ///
    /// Jobs are not started until [`start`](Self::start) is called.
    pub fn with_job<J: SchedulerJob + 'static>(mut self, job: J) -> Self {
        self.jobs.push(Arc::new(job));
        self
    }

    /// Starts all registered jobs.
    ///
    /// The first run of every job happens immediately. Returns after spawning.
    pub fn start(&self) -> Vec<tokio::task::JoinHandle<()>> {
        self.jobs
            .iter()
            .map(|job| {
                let job = Arc::clone(job);
                tokio::spawn(async move {
                    Self::run_job_loop(job).await;
                })
            })
            .collect()
    }

    async fn run_job_loop(job: Arc<dyn SchedulerJob>) {
        let name = job.name();
        let interval = job.interval();

        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            timer.tick().await;

            match job.execute().await {
                Ok(()) => {
                    tracing::debug!("Job '{}' completed successfully", name);
                }
                Err(e) => {
                    tracing::error!("Job '{}' failed: {}", name, e);
                }
            }
        }
    }

    /// Returns the number of registered jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }
}

impl Default for SchedulerService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingJob {
        runs: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SchedulerJob for CountingJob {
        fn name(&self) -> &'static str {
            "Counting"
        }

        fn interval(&self) -> Duration {
            Duration::from_secs(3600)
        }

        async fn execute(&self) -> JobResult {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_job_runs_on_start() {
        let runs = Arc::new(AtomicUsize::new(0));
        let scheduler = SchedulerService::new().with_job(CountingJob {
            runs: Arc::clone(&runs),
        });
        assert_eq!(scheduler.job_count(), 1);

        let handles = scheduler.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        for handle in handles {
            handle.abort();
        }

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
