use douban::DoubanClient;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::Config;
use crate::repositories::{FilmRepository, SqliteFilmRepository};
use crate::services::{
    build_http_client, CatalogSource, DoubanCatalog, FetchPool, MovieService, MovieSyncJob,
    SchedulerService,
};

/// Long-lived application services, built once per process
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub movies: Arc<MovieService>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Result<Self, reqwest::Error> {
        // One HTTP client and one fetch pool, shared by every sync
        let http_client = build_http_client(&config.douban)?;
        let douban = Arc::new(DoubanClient::with_base_url(
            http_client,
            config.douban.base_url.clone(),
        ));
        let fetch_pool = FetchPool::new(config.sync.workers);

        let films: Arc<dyn FilmRepository> = Arc::new(SqliteFilmRepository::new(db));
        let catalog: Arc<dyn CatalogSource> =
            Arc::new(DoubanCatalog::new(douban, config.douban.clone()));

        let movies = Arc::new(MovieService::new(films, catalog, fetch_pool));

        Ok(Self {
            config: Arc::new(config),
            movies,
        })
    }

    /// Scheduler with the periodic movie sync registered (not started)
    pub fn scheduler(&self) -> SchedulerService {
        SchedulerService::new().with_job(MovieSyncJob::new(
            Arc::clone(&self.movies),
            self.config.sync.interval(),
        ))
    }
}
