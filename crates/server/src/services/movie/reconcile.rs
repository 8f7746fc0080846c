use std::collections::{HashMap, HashSet};

use super::{MovieError, MovieService};
use crate::models::{CatalogItem, Film, MovieType};

/// Result of reconciling one curated list
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Number of films moved to `Normal` before the fresh list was applied
    pub demoted: usize,
    /// Films created or updated from the fresh list
    pub films: Vec<Film>,
}

impl MovieService {
    /// Align stored films of `movie_type` with a freshly fetched list.
    ///
    /// Every film currently in the category is first demoted to `Normal` and
    /// that demotion is written immediately. Fresh items are then merged onto
    /// the stored film with the same Douban ID (keeping its internal id and
    /// any fetched detail) or created, and written as one batch.
    ///
    /// Reconciling `Normal` does nothing.
    pub async fn reconcile(
        &self,
        movie_type: MovieType,
        fresh: Vec<CatalogItem>,
    ) -> Result<Reconciliation, MovieError> {
        if !movie_type.is_curated() {
            return Ok(Reconciliation::default());
        }

        let demoted = self.demote(movie_type).await?;

        let mut seen = HashSet::new();
        let fresh: Vec<CatalogItem> = fresh
            .into_iter()
            .filter(|item| seen.insert(item.movie_id))
            .collect();

        let movie_ids: Vec<i64> = fresh.iter().map(|item| item.movie_id).collect();
        let mut stored: HashMap<i64, Film> = self
            .films
            .find_by_movie_ids(&movie_ids)
            .await?
            .into_iter()
            .map(|film| (film.movie_id, film))
            .collect();

        let merged: Vec<Film> = fresh
            .iter()
            .map(|item| match stored.remove(&item.movie_id) {
                Some(film) => film.merge_catalog(item, movie_type),
                None => Film::from_catalog(item, movie_type),
            })
            .collect();

        let films = self.save_batch(&merged).await?;

        Ok(Reconciliation { demoted, films })
    }

    /// Move every film of `movie_type` to `Normal`
    async fn demote(&self, movie_type: MovieType) -> Result<usize, MovieError> {
        let current: Vec<Film> = self
            .films
            .find_by_movie_type(movie_type)
            .await?
            .into_iter()
            .map(|mut film| {
                film.movie_type = MovieType::Normal;
                film
            })
            .collect();

        self.save_batch(&current).await?;
        tracing::info!("Set {} old {} movies to normal", current.len(), movie_type);

        Ok(current.len())
    }
}
