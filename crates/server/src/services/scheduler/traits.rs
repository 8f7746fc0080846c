use async_trait::async_trait;
use std::time::Duration;

pub type JobResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// A periodic background job run by [`SchedulerService`](super::SchedulerService).
#[async_trait]
pub trait SchedulerJob: Send + Sync {
    /// Job name used in logs
    fn name(&self) -> &'static str;

    /// Time between runs
    fn interval(&self) -> Duration;

    async fn execute(&self) -> JobResult;
}
