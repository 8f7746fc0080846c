//! Film sync service.
//!
//! A sync of one category runs in two steps:
//!
//! 1. [`reconcile`](MovieService::reconcile): align stored films with the
//!    freshly fetched curated list (demote, merge, create).
//! 2. [`enrich`](MovieService::enrich): fetch summary and countries for films
//!    that still lack them, through the shared [`FetchPool`].
//!
//! [`resolve`](MovieService::resolve) backfills individual ids on demand.

mod backfill;
mod enrich;
mod reconcile;

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::models::{Film, MovieType};
use crate::repositories::FilmRepository;
use crate::services::{CatalogSource, FetchPool};

pub use reconcile::Reconciliation;

#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("All categories failed to sync: {0}")]
    SyncFailed(String),
}

/// Outcome of syncing one category
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub movie_type: MovieType,
    /// Films that lost the category before the fresh list was applied
    pub demoted: usize,
    /// Films created or updated from the fresh list
    pub reconciled: usize,
    /// Films that received summary and countries
    pub enriched: usize,
    pub elapsed: Duration,
}

/// Service for syncing and querying films
pub struct MovieService {
    films: Arc<dyn FilmRepository>,
    catalog: Arc<dyn CatalogSource>,
    pool: FetchPool,
}

impl MovieService {
    pub fn new(
        films: Arc<dyn FilmRepository>,
        catalog: Arc<dyn CatalogSource>,
        pool: FetchPool,
    ) -> Self {
        Self {
            films,
            catalog,
            pool,
        }
    }

    /// Get a film by Douban ID
    pub async fn get_by_id(&self, movie_id: i64) -> Result<Option<Film>, MovieError> {
        Ok(self.films.find_by_movie_id(movie_id).await?)
    }

    /// Get films of one category, best rated first
    pub async fn get_by_type(&self, movie_type: MovieType) -> Result<Vec<Film>, MovieError> {
        Ok(self.films.find_by_movie_type(movie_type).await?)
    }

    /// Get all films, newest first then best rated
    pub async fn get_all(&self) -> Result<Vec<Film>, MovieError> {
        Ok(self.films.find_all_ordered().await?)
    }

    /// Get films by Douban IDs, fetching any that are missing or lack detail
    pub async fn get_by_ids(&self, movie_ids: &[Option<i64>]) -> Result<Vec<Film>, MovieError> {
        self.resolve(movie_ids).await
    }

    /// Sync one category: pull the fresh list, reconcile it, then enrich.
    ///
    /// An unreachable upstream yields an empty list, in which case every film
    /// of the category stays demoted to `Normal` until the next successful sync.
    pub async fn sync(&self, movie_type: MovieType) -> Result<SyncReport, MovieError> {
        let started = Instant::now();
        tracing::info!("Syncing {} movies from {}", movie_type, self.catalog.name());

        let fresh = self.catalog.fetch_list(movie_type).await;
        if fresh.is_empty() && movie_type.is_curated() {
            tracing::warn!(
                "No {} movies fetched, stored {} movies will be left as normal",
                movie_type,
                movie_type
            );
        }

        let reconciliation = self.reconcile(movie_type, fresh).await?;
        let enriched = self.enrich(movie_type).await?;

        let report = SyncReport {
            movie_type,
            demoted: reconciliation.demoted,
            reconciled: reconciliation.films.len(),
            enriched,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            "Synced {} movies in {:?}: {} demoted, {} reconciled, {} enriched",
            movie_type,
            report.elapsed,
            report.demoted,
            report.reconciled,
            report.enriched
        );

        Ok(report)
    }

    /// Sync every curated category in turn.
    ///
    /// A failing category is logged and does not stop the others.
    pub async fn sync_all(&self) -> Vec<(MovieType, Result<SyncReport, MovieError>)> {
        let mut results = Vec::with_capacity(MovieType::CURATED.len());
        for movie_type in MovieType::CURATED {
            let result = self.sync(movie_type).await;
            if let Err(e) = &result {
                tracing::error!("Failed to sync {} movies: {}", movie_type, e);
            }
            results.push((movie_type, result));
        }
        results
    }

    /// Sync every curated category, failing only when none of them succeeded.
    ///
    /// Returns the reports of the categories that did sync.
    pub async fn sync_curated(&self) -> Result<Vec<SyncReport>, MovieError> {
        let results = self.sync_all().await;
        if results.is_empty() || results.iter().any(|(_, result)| result.is_ok()) {
            return Ok(results.into_iter().filter_map(|(_, result)| result.ok()).collect());
        }

        let failed: Vec<String> = results.iter().map(|(movie_type, _)| movie_type.to_string()).collect();
        Err(MovieError::SyncFailed(failed.join(", ")))
    }

    /// Persist a batch, skipping the round trip when there is nothing to write
    async fn save_batch(&self, films: &[Film]) -> Result<Vec<Film>, MovieError> {
        if films.is_empty() {
            return Ok(Vec::new());
        }
        let saved = self.films.save_all(films).await?;
        tracing::info!("Saved {} movies", saved.len());
        Ok(saved)
    }
}
