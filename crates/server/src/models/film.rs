use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::CatalogItem;

/// Why a film is tracked: membership of a curated list, or `Normal` once it
/// dropped out of every list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieType {
    /// Currently in theaters
    Recent,
    /// Top rated
    Top,
    #[default]
    Normal,
}

impl MovieType {
    /// Categories backed by an upstream list
    pub const CURATED: [MovieType; 2] = [MovieType::Recent, MovieType::Top];

    pub fn as_str(&self) -> &'static str {
        match self {
            MovieType::Recent => "recent",
            MovieType::Top => "top",
            MovieType::Normal => "normal",
        }
    }

    pub fn is_curated(&self) -> bool {
        !matches!(self, MovieType::Normal)
    }
}

impl fmt::Display for MovieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown movie type: {0}")]
pub struct UnknownMovieType(pub String);

impl FromStr for MovieType {
    type Err = UnknownMovieType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recent" => Ok(MovieType::Recent),
            "top" => Ok(MovieType::Top),
            "normal" => Ok(MovieType::Normal),
            other => Err(UnknownMovieType(other.to_string())),
        }
    }
}

/// Stored film.
///
/// `id` is the internal key and never changes once assigned; `movie_id` is the
/// upstream key and is unique across the table. An `id` of 0 marks a film
/// that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Douban subject ID
    pub movie_id: i64,
    pub movie_type: MovieType,

    pub title: String,
    pub original_title: Option<String>,
    pub year: Option<i32>,
    pub rating: f64,
    pub genres: Vec<String>,
    pub poster_url: Option<String>,

    /// Filled by detail enrichment
    pub summary: Option<String>,
    /// Filled by detail enrichment
    pub countries: Option<Vec<String>>,
}

impl Film {
    /// Build an unsaved film from a catalog item
    pub fn from_catalog(item: &CatalogItem, movie_type: MovieType) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            created_at: now,
            updated_at: now,
            movie_id: item.movie_id,
            movie_type,
            title: item.title.clone(),
            original_title: item.original_title.clone(),
            year: item.year,
            rating: item.rating,
            genres: item.genres.clone(),
            poster_url: item.poster_url.clone(),
            summary: item.summary().map(str::to_string),
            countries: non_empty(&item.countries),
        }
    }

    /// Overlay fresh catalog data onto this film.
    ///
    /// Identity (`id`, `movie_id`, `created_at`) is kept. Summary and countries
    /// are only replaced when the item carries them, so list data never wipes
    /// previously fetched detail.
    pub fn merge_catalog(mut self, item: &CatalogItem, movie_type: MovieType) -> Self {
        self.movie_type = movie_type;
        self.title = item.title.clone();
        if item.original_title.is_some() {
            self.original_title = item.original_title.clone();
        }
        if item.year.is_some() {
            self.year = item.year;
        }
        self.rating = item.rating;
        if !item.genres.is_empty() {
            self.genres = item.genres.clone();
        }
        if item.poster_url.is_some() {
            self.poster_url = item.poster_url.clone();
        }
        self.apply_detail(item);
        self
    }

    /// Copy summary and countries from a detail response.
    ///
    /// Returns false (and leaves the film untouched) when the detail has no
    /// usable summary.
    pub fn apply_detail(&mut self, detail: &CatalogItem) -> bool {
        let Some(summary) = detail.summary() else {
            return false;
        };
        self.summary = Some(summary.to_string());
        if let Some(countries) = non_empty(&detail.countries) {
            self.countries = Some(countries);
        }
        true
    }

    /// Whether detail enrichment already ran for this film
    pub fn has_summary(&self) -> bool {
        self.summary
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(movie_id: i64, summary: &str) -> CatalogItem {
        CatalogItem {
            summary: Some(summary.to_string()),
            countries: vec!["美国".to_string()],
            ..CatalogItem::new(movie_id, "肖申克的救赎")
        }
    }

    #[test]
    fn test_movie_type_roundtrip() {
        for movie_type in [MovieType::Recent, MovieType::Top, MovieType::Normal] {
            assert_eq!(movie_type.as_str().parse::<MovieType>().unwrap(), movie_type);
        }
        assert_eq!(" TOP ".parse::<MovieType>().unwrap(), MovieType::Top);
        assert!("upcoming".parse::<MovieType>().is_err());
    }

    #[test]
    fn test_curated() {
        assert!(MovieType::Recent.is_curated());
        assert!(MovieType::Top.is_curated());
        assert!(!MovieType::Normal.is_curated());
        assert!(!MovieType::CURATED.contains(&MovieType::Normal));
    }

    #[test]
    fn test_from_catalog_is_unsaved() {
        let film = Film::from_catalog(&CatalogItem::new(1, "A"), MovieType::Recent);
        assert_eq!(film.id, 0);
        assert_eq!(film.movie_id, 1);
        assert_eq!(film.movie_type, MovieType::Recent);
        assert!(film.summary.is_none());
        assert!(film.countries.is_none());
    }

    #[test]
    fn test_merge_keeps_identity_and_detail() {
        let mut film = Film::from_catalog(&detail(1, "old summary"), MovieType::Normal);
        film.id = 7;
        let created_at = film.created_at;

        let fresh = CatalogItem {
            rating: 9.1,
            ..CatalogItem::new(1, "New Title")
        };
        let merged = film.merge_catalog(&fresh, MovieType::Top);

        assert_eq!(merged.id, 7);
        assert_eq!(merged.created_at, created_at);
        assert_eq!(merged.movie_type, MovieType::Top);
        assert_eq!(merged.title, "New Title");
        assert_eq!(merged.rating, 9.1);
        assert_eq!(merged.summary.as_deref(), Some("old summary"));
        assert_eq!(merged.countries, Some(vec!["美国".to_string()]));
    }

    #[test]
    fn test_apply_detail_ignores_blank_summary() {
        let mut film = Film::from_catalog(&detail(1, "kept"), MovieType::Top);
        assert!(!film.apply_detail(&detail(1, "   ")));
        assert_eq!(film.summary.as_deref(), Some("kept"));

        let mut bare = Film::from_catalog(&CatalogItem::new(2, "B"), MovieType::Top);
        assert!(!bare.has_summary());
        assert!(bare.apply_detail(&detail(2, "filled")));
        assert!(bare.has_summary());
    }
}
