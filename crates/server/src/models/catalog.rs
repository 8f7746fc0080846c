use serde::{Deserialize, Serialize};

/// Movie as reported by the upstream catalog (not persisted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Upstream (Douban) subject ID
    pub movie_id: i64,
    pub title: String,
    pub original_title: Option<String>,
    pub year: Option<i32>,
    pub rating: f64,
    pub genres: Vec<String>,
    /// Only present on detail responses
    pub countries: Vec<String>,
    /// Only present on detail responses
    pub summary: Option<String>,
    pub poster_url: Option<String>,
}

impl CatalogItem {
    pub fn new(movie_id: i64, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
            original_title: None,
            year: None,
            rating: 0.0,
            genres: Vec::new(),
            countries: Vec::new(),
            summary: None,
            poster_url: None,
        }
    }

    /// Summary, if upstream sent a non-blank one
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref().filter(|s| !s.trim().is_empty())
    }
}
