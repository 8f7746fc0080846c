use std::sync::Arc;

use super::{MovieError, MovieService};
use crate::models::{Film, MovieType};

impl MovieService {
    /// Fetch summary and countries for films of `movie_type` that lack them.
    ///
    /// Fetches run concurrently through the shared pool; each one owns its
    /// film until all of them have settled. Films whose fetch fails are left
    /// as they are and picked up again by the next sync. The enriched films
    /// are written as one batch.
    ///
    /// Returns the number of films updated.
    pub async fn enrich(&self, movie_type: MovieType) -> Result<usize, MovieError> {
        let pending: Vec<Film> = self
            .films
            .find_by_movie_type(movie_type)
            .await?
            .into_iter()
            .filter(|film| !film.has_summary())
            .collect();

        if pending.is_empty() {
            tracing::debug!("All {} movies already have a summary", movie_type);
            return Ok(0);
        }

        let dispatched = pending.len();
        tracing::info!(
            "Fetching detail for {} {} movies ({} workers)",
            dispatched,
            movie_type,
            self.pool.workers()
        );

        let results = self
            .pool
            .run_all(pending, |mut film| {
                let catalog = Arc::clone(&self.catalog);
                async move {
                    match catalog.fetch_detail(film.movie_id).await {
                        Some(detail) if film.apply_detail(&detail) => Some(film),
                        Some(_) => {
                            tracing::debug!("Movie {} has no summary upstream", film.movie_id);
                            None
                        }
                        None => {
                            tracing::debug!("Skipping movie {}, detail unavailable", film.movie_id);
                            None
                        }
                    }
                }
            })
            .await;

        let enriched: Vec<Film> = results.into_iter().flatten().collect();
        if enriched.len() < dispatched {
            tracing::warn!(
                "Fetched detail for {}/{} {} movies",
                enriched.len(),
                dispatched,
                movie_type
            );
        }

        let saved = self.save_batch(&enriched).await?;
        Ok(saved.len())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::repositories::FilmRepository;
    use crate::services::catalog::fake::FakeCatalog;
    use crate::services::movie::test_support::{harness, seed};

    #[tokio::test]
    async fn test_one_failed_fetch_out_of_three() {
        let catalog = FakeCatalog::new()
            .with_detail(1, "summary 1", &["美国"])
            .with_detail(3, "summary 3", &["法国", "意大利"]);
        let h = harness(catalog).await;
        for movie_id in 1..=3 {
            seed(&h.films, movie_id, MovieType::Recent, None).await;
        }

        let updated = h.service.enrich(MovieType::Recent).await.unwrap();

        assert_eq!(updated, 2);
        assert_eq!(h.catalog.detail_calls(), 3);

        let first = h.films.find_by_movie_id(1).await.unwrap().unwrap();
        assert_eq!(first.summary.as_deref(), Some("summary 1"));
        assert_eq!(first.countries, Some(vec!["美国".to_string()]));

        let third = h.films.find_by_movie_id(3).await.unwrap().unwrap();
        assert_eq!(
            third.countries,
            Some(vec!["法国".to_string(), "意大利".to_string()])
        );

        let failed = h.films.find_by_movie_id(2).await.unwrap().unwrap();
        assert!(failed.summary.is_none());
        assert!(failed.countries.is_none());
        assert_eq!(failed.movie_type, MovieType::Recent);
    }

    #[tokio::test]
    async fn test_existing_summary_is_not_refetched() {
        let catalog = FakeCatalog::new().with_detail(2, "fresh", &[]);
        let h = harness(catalog).await;
        seed(&h.films, 1, MovieType::Top, Some("existing")).await;
        seed(&h.films, 2, MovieType::Top, None).await;

        let updated = h.service.enrich(MovieType::Top).await.unwrap();

        assert_eq!(updated, 1);
        assert_eq!(h.catalog.detail_calls(), 1);

        let kept = h.films.find_by_movie_id(1).await.unwrap().unwrap();
        assert_eq!(kept.summary.as_deref(), Some("existing"));
    }

    #[tokio::test]
    async fn test_blank_upstream_summary_is_skipped() {
        let catalog = FakeCatalog::new().with_detail(1, "  ", &["美国"]);
        let h = harness(catalog).await;
        seed(&h.films, 1, MovieType::Top, None).await;

        assert_eq!(h.service.enrich(MovieType::Top).await.unwrap(), 0);

        let film = h.films.find_by_movie_id(1).await.unwrap().unwrap();
        assert!(film.summary.is_none());
        assert!(film.countries.is_none());
    }

    #[tokio::test]
    async fn test_fetches_are_bounded_by_pool() {
        let mut catalog = FakeCatalog::new().with_delay(Duration::from_millis(20));
        for movie_id in 1..=6 {
            catalog = catalog.with_detail(movie_id, "summary", &[]);
        }
        let h = harness(catalog).await;
        for movie_id in 1..=6 {
            seed(&h.films, movie_id, MovieType::Recent, None).await;
        }

        let updated = h.service.enrich(MovieType::Recent).await.unwrap();

        assert_eq!(updated, 6);
        let peak = h
            .catalog
            .max_in_flight
            .load(std::sync::atomic::Ordering::SeqCst);
        assert!(peak >= 1 && peak <= 2, "peak in-flight fetches: {}", peak);
    }

    #[tokio::test]
    async fn test_nothing_pending() {
        let h = harness(FakeCatalog::new()).await;
        assert_eq!(h.service.enrich(MovieType::Recent).await.unwrap(), 0);
        assert_eq!(h.catalog.detail_calls(), 0);
    }
}
