use std::collections::{HashMap, HashSet};

use super::{MovieError, MovieService};
use crate::models::{Film, MovieType};

impl MovieService {
    /// Look up films by Douban ID, fetching the ones that are missing or have
    /// no summary yet.
    ///
    /// `None` entries and duplicates are dropped before anything is queried.
    /// Missing films are fetched one by one on the caller's task; an id whose
    /// fetch fails is simply absent from the result. Order follows the store.
    pub async fn resolve(&self, movie_ids: &[Option<i64>]) -> Result<Vec<Film>, MovieError> {
        let mut seen = HashSet::new();
        let movie_ids: Vec<i64> = movie_ids
            .iter()
            .flatten()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        if movie_ids.is_empty() {
            return Ok(Vec::new());
        }

        let stored: HashMap<i64, Film> = self
            .films
            .find_by_movie_ids(&movie_ids)
            .await?
            .into_iter()
            .map(|film| (film.movie_id, film))
            .collect();

        let mut backfilled = Vec::new();
        for &movie_id in &movie_ids {
            let existing = stored.get(&movie_id);
            if existing.is_some_and(Film::has_summary) {
                continue;
            }
            if let Some(film) = self.fetch_film(movie_id, existing).await {
                backfilled.push(film);
            }
        }

        if !backfilled.is_empty() {
            tracing::info!(
                "Backfilled {}/{} requested movies",
                backfilled.len(),
                movie_ids.len()
            );
        }
        self.save_batch(&backfilled).await?;

        Ok(self.films.find_by_movie_ids(&movie_ids).await?)
    }

    /// Fetch one movie's detail and turn it into a film ready to save.
    ///
    /// An existing film keeps its id, category and creation time; a new one
    /// starts out as `Normal`.
    async fn fetch_film(&self, movie_id: i64, existing: Option<&Film>) -> Option<Film> {
        let Some(detail) = self.catalog.fetch_detail(movie_id).await else {
            tracing::warn!("Can not fetch movie {}, skipping", movie_id);
            return None;
        };

        Some(match existing {
            Some(film) => film.clone().merge_catalog(&detail, film.movie_type),
            None => Film::from_catalog(&detail, MovieType::Normal),
        })
    }
}
