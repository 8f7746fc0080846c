use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::traits::{JobResult, SchedulerJob};
use crate::services::MovieService;

/// Periodically syncs every curated movie list.
pub struct MovieSyncJob {
    movies: Arc<MovieService>,
    interval: Duration,
}

impl MovieSyncJob {
    pub fn new(movies: Arc<MovieService>, interval: Duration) -> Self {
        Self { movies, interval }
    }
}

#[async_trait]
impl SchedulerJob for MovieSyncJob {
    fn name(&self) -> &'static str {
        "MovieSync"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn execute(&self) -> JobResult {
        tracing::info!("Running movie sync job");

        self.movies.sync_curated().await?;
        Ok(())
    }
}
