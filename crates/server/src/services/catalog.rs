//! Catalog boundary.
//!
//! [`CatalogSource`] is what the sync engine fetches from. Implementations
//! swallow transient upstream failures: a failed list is empty and a failed
//! detail is `None`, so one bad request never fails a whole sync.

use std::sync::Arc;

use async_trait::async_trait;
use douban::{DoubanClient, ListParams, Subject};

use crate::config::DoubanSettings;
use crate::models::{CatalogItem, MovieType};

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Current contents of the curated list behind `movie_type`
    async fn fetch_list(&self, movie_type: MovieType) -> Vec<CatalogItem>;

    /// Full detail (summary, countries) for one movie
    async fn fetch_detail(&self, movie_id: i64) -> Option<CatalogItem>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Douban-backed catalog source
pub struct DoubanCatalog {
    client: Arc<DoubanClient>,
    settings: DoubanSettings,
}

impl DoubanCatalog {
    pub fn new(client: Arc<DoubanClient>, settings: DoubanSettings) -> Self {
        Self { client, settings }
    }

    /// Page through a list endpoint until upstream runs out or `max_items` is reached.
    ///
    /// A failing page ends the walk; items from earlier pages are kept.
    pub async fn fetch_pages(&self, path: &str, movie_type: MovieType) -> Vec<CatalogItem> {
        let max_items = self.settings.max_items;
        let page_size = self.settings.page_size.max(1);
        let city = (movie_type == MovieType::Recent).then(|| self.settings.city.clone());

        let mut items = Vec::new();
        let mut start = 0;

        while start < max_items {
            let params = ListParams {
                start,
                count: page_size.min(max_items - start),
                city: city.clone(),
            };

            let page = match self.client.list_subjects(path, &params).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        "Failed to fetch {} movies from {} (start={}): {}",
                        movie_type,
                        path,
                        start,
                        e
                    );
                    break;
                }
            };

            let received = page.subjects.len() as u32;
            items.extend(
                page.subjects
                    .into_iter()
                    .map(to_catalog_item),
            );
            start += received;

            if received == 0 || start >= page.total {
                break;
            }
        }

        items
    }
}

#[async_trait]
impl CatalogSource for DoubanCatalog {
    async fn fetch_list(&self, movie_type: MovieType) -> Vec<CatalogItem> {
        let Some(path) = self.settings.list_path(movie_type) else {
            return Vec::new();
        };
        let items = self.fetch_pages(path, movie_type).await;
        tracing::debug!("Fetched {} {} movies from Douban", items.len(), movie_type);
        items
    }

    async fn fetch_detail(&self, movie_id: i64) -> Option<CatalogItem> {
        match self.client.get_subject(movie_id).await {
            Ok(subject) => Some(to_catalog_item(subject)),
            Err(e) => {
                tracing::warn!("Can not fetch movie {}: {}", movie_id, e);
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "douban"
    }
}

fn to_catalog_item(subject: Subject) -> CatalogItem {
    let poster_url = subject.poster_url().map(str::to_string);
    CatalogItem {
        movie_id: subject.id,
        title: subject.title,
        original_title: subject.original_title.filter(|t| !t.is_empty()),
        year: subject.year,
        rating: subject.rating.average,
        genres: subject.genres,
        countries: subject.countries,
        summary: subject.summary,
        poster_url,
    }
}
