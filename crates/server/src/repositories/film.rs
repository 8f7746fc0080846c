//! Film persistence.
//!
//! [`FilmRepository`] is the store the sync engine works against;
//! [`SqliteFilmRepository`] backs it with the `film` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{Film, MovieType};

/// Separator for list columns (genres, countries)
const SEPARATOR: &str = "/";

/// Common SELECT fields for film queries
const SELECT_FILM: &str = r#"
    SELECT
        id, created_at, updated_at,
        movie_id, movie_type,
        title, original_title, year, rating,
        genres, poster_url, summary, countries
    FROM film
"#;

const UPSERT_ASSIGNMENTS: &str = r#"
    movie_type = excluded.movie_type,
    title = excluded.title,
    original_title = excluded.original_title,
    year = excluded.year,
    rating = excluded.rating,
    genres = excluded.genres,
    poster_url = excluded.poster_url,
    summary = COALESCE(excluded.summary, film.summary),
    countries = COALESCE(excluded.countries, film.countries),
    updated_at = excluded.updated_at
"#;

#[async_trait]
pub trait FilmRepository: Send + Sync {
    /// Find a film by its Douban ID
    async fn find_by_movie_id(&self, movie_id: i64) -> Result<Option<Film>, sqlx::Error>;

    /// Find all films whose Douban ID is in `movie_ids`
    async fn find_by_movie_ids(&self, movie_ids: &[i64]) -> Result<Vec<Film>, sqlx::Error>;

    /// Films of one category, best rated first
    async fn find_by_movie_type(&self, movie_type: MovieType) -> Result<Vec<Film>, sqlx::Error>;

    /// All films, newest year first, then best rated
    async fn find_all_ordered(&self) -> Result<Vec<Film>, sqlx::Error>;

    /// Insert or update every film in one transaction.
    ///
    /// Films with a non-zero `id` are upserted on `id`; unsaved films (`id == 0`)
    /// are upserted on `movie_id`, so a Douban ID is never stored twice.
    /// A `None` summary or countries never clears a stored value.
    ///
    /// Returns the saved rows.
    async fn save_all(&self, films: &[Film]) -> Result<Vec<Film>, sqlx::Error>;
}

pub struct SqliteFilmRepository {
    pool: SqlitePool,
}

impl SqliteFilmRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Film>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "{} WHERE id IN ({}) ORDER BY id",
            SELECT_FILM,
            placeholders(ids.len())
        );
        let mut q = sqlx::query_as::<_, FilmRow>(&query);
        for id in ids {
            q = q.bind(*id);
        }
        let rows = q.fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl FilmRepository for SqliteFilmRepository {
    async fn find_by_movie_id(&self, movie_id: i64) -> Result<Option<Film>, sqlx::Error> {
        let query = format!("{} WHERE movie_id = $1", SELECT_FILM);
        let row = sqlx::query_as::<_, FilmRow>(&query)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_movie_ids(&self, movie_ids: &[i64]) -> Result<Vec<Film>, sqlx::Error> {
        if movie_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "{} WHERE movie_id IN ({})",
            SELECT_FILM,
            placeholders(movie_ids.len())
        );
        let mut q = sqlx::query_as::<_, FilmRow>(&query);
        for movie_id in movie_ids {
            q = q.bind(*movie_id);
        }
        let rows = q.fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_movie_type(&self, movie_type: MovieType) -> Result<Vec<Film>, sqlx::Error> {
        let query = format!("{} WHERE movie_type = $1 ORDER BY rating DESC", SELECT_FILM);
        let rows = sqlx::query_as::<_, FilmRow>(&query)
            .bind(movie_type.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_all_ordered(&self) -> Result<Vec<Film>, sqlx::Error> {
        let query = format!("{} ORDER BY year DESC, rating DESC", SELECT_FILM);
        let rows = sqlx::query_as::<_, FilmRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn save_all(&self, films: &[Film]) -> Result<Vec<Film>, sqlx::Error> {
        if films.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(films.len());

        for film in films {
            let query = if film.id == 0 {
                format!(
                    r#"
                    INSERT INTO film (
                        created_at, updated_at, movie_id, movie_type,
                        title, original_title, year, rating,
                        genres, poster_url, summary, countries
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                    ON CONFLICT(movie_id) DO UPDATE SET {}
                    RETURNING id
                    "#,
                    UPSERT_ASSIGNMENTS
                )
            } else {
                format!(
                    r#"
                    INSERT INTO film (
                        created_at, updated_at, movie_id, movie_type,
                        title, original_title, year, rating,
                        genres, poster_url, summary, countries, id
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                    ON CONFLICT(id) DO UPDATE SET {}
                    RETURNING id
                    "#,
                    UPSERT_ASSIGNMENTS
                )
            };

            let mut q = sqlx::query_scalar::<_, i64>(&query)
                .bind(film.created_at)
                .bind(now)
                .bind(film.movie_id)
                .bind(film.movie_type.as_str())
                .bind(&film.title)
                .bind(&film.original_title)
                .bind(film.year)
                .bind(film.rating)
                .bind(film.genres.join(SEPARATOR))
                .bind(&film.poster_url)
                .bind(&film.summary)
                .bind(film.countries.as_ref().map(|c| c.join(SEPARATOR)));
            if film.id != 0 {
                q = q.bind(film.id);
            }

            ids.push(q.fetch_one(&mut *tx).await?);
        }

        tx.commit().await?;

        self.find_by_ids(&ids).await
    }
}

fn placeholders(n: usize) -> String {
    (1..=n)
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Internal row type for mapping SQLite results
#[derive(Debug, sqlx::FromRow)]
struct FilmRow {
    id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    movie_id: i64,
    movie_type: String,
    title: String,
    original_title: Option<String>,
    year: Option<i32>,
    rating: f64,
    genres: String,
    poster_url: Option<String>,
    summary: Option<String>,
    countries: Option<String>,
}

impl From<FilmRow> for Film {
    fn from(row: FilmRow) -> Self {
        let movie_type = row.movie_type.parse::<MovieType>().unwrap_or_else(|e| {
            tracing::warn!("Movie {} has unknown type {:?}, reading it as normal", row.movie_id, e.0);
            MovieType::default()
        });

        Self {
            id: row.id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            movie_id: row.movie_id,
            movie_type,
            title: row.title,
            original_title: row.original_title,
            year: row.year,
            rating: row.rating,
            genres: split_list(&row.genres),
            poster_url: row.poster_url,
            summary: row.summary,
            countries: row.countries.as_deref().map(split_list),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::models::CatalogItem;

    async fn repository() -> SqliteFilmRepository {
        SqliteFilmRepository::new(create_memory_pool().await.unwrap())
    }

    fn film(movie_id: i64, movie_type: MovieType, year: i32, rating: f64) -> Film {
        let item = CatalogItem {
            year: Some(year),
            rating,
            genres: vec!["剧情".to_string(), "犯罪".to_string()],
            ..CatalogItem::new(movie_id, format!("film {}", movie_id))
        };
        Film::from_catalog(&item, movie_type)
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "$1");
        assert_eq!(placeholders(3), "$1, $2, $3");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("美国 / 英国"), vec!["美国", "英国"]);
        assert!(split_list("").is_empty());
    }

    #[tokio::test]
    async fn test_unknown_stored_type_reads_as_normal() {
        let repo = repository().await;
        sqlx::query(
            "INSERT INTO film (created_at, updated_at, movie_id, movie_type, title) \
             VALUES ('2024-06-01T00:00:00Z', '2024-06-01T00:00:00Z', 7, 'upcoming', 'film 7')",
        )
        .execute(&repo.pool)
        .await
        .unwrap();

        let film = repo.find_by_movie_id(7).await.unwrap().unwrap();
        assert_eq!(film.movie_type, MovieType::Normal);
        assert_eq!(film.title, "film 7");
    }

    #[tokio::test]
    async fn test_save_all_assigns_ids() {
        let repo = repository().await;
        let saved = repo
            .save_all(&[film(1, MovieType::Top, 1994, 9.7), film(2, MovieType::Top, 1993, 9.6)])
            .await
            .unwrap();

        assert_eq!(saved.len(), 2);
        assert!(saved.iter().all(|f| f.id > 0));

        let found = repo.find_by_movie_id(1).await.unwrap().unwrap();
        assert_eq!(found.movie_type, MovieType::Top);
        assert_eq!(found.genres, vec!["剧情", "犯罪"]);
        assert!(found.countries.is_none());
    }

    #[tokio::test]
    async fn test_unsaved_film_upserts_on_movie_id() {
        let repo = repository().await;
        let first = repo.save_all(&[film(1, MovieType::Top, 1994, 9.7)]).await.unwrap();

        let again = repo.save_all(&[film(1, MovieType::Recent, 1994, 9.5)]).await.unwrap();

        assert_eq!(again[0].id, first[0].id);
        assert_eq!(again[0].movie_type, MovieType::Recent);
        assert_eq!(repo.find_all_ordered().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_never_clears_summary() {
        let repo = repository().await;
        let mut with_summary = film(1, MovieType::Top, 1994, 9.7);
        with_summary.summary = Some("希望让人自由".to_string());
        with_summary.countries = Some(vec!["美国".to_string()]);
        let saved = repo.save_all(&[with_summary]).await.unwrap();

        let mut bare = saved[0].clone();
        bare.summary = None;
        bare.countries = None;
        bare.movie_type = MovieType::Normal;
        repo.save_all(&[bare]).await.unwrap();

        let found = repo.find_by_movie_id(1).await.unwrap().unwrap();
        assert_eq!(found.movie_type, MovieType::Normal);
        assert_eq!(found.summary.as_deref(), Some("希望让人自由"));
        assert_eq!(found.countries, Some(vec!["美国".to_string()]));
    }

    #[tokio::test]
    async fn test_find_by_movie_type_orders_by_rating() {
        let repo = repository().await;
        repo.save_all(&[
            film(1, MovieType::Top, 1994, 9.1),
            film(2, MovieType::Top, 1993, 9.6),
            film(3, MovieType::Recent, 2024, 7.0),
        ])
        .await
        .unwrap();

        let top: Vec<i64> = repo
            .find_by_movie_type(MovieType::Top)
            .await
            .unwrap()
            .iter()
            .map(|f| f.movie_id)
            .collect();
        assert_eq!(top, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_find_all_ordered_by_year_then_rating() {
        let repo = repository().await;
        repo.save_all(&[
            film(1, MovieType::Top, 1994, 9.1),
            film(2, MovieType::Top, 1994, 9.6),
            film(3, MovieType::Recent, 2024, 7.0),
        ])
        .await
        .unwrap();

        let all: Vec<i64> = repo
            .find_all_ordered()
            .await
            .unwrap()
            .iter()
            .map(|f| f.movie_id)
            .collect();
        assert_eq!(all, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_find_by_movie_ids() {
        let repo = repository().await;
        repo.save_all(&[film(1, MovieType::Top, 1994, 9.1), film(2, MovieType::Top, 1993, 9.6)])
            .await
            .unwrap();

        assert!(repo.find_by_movie_ids(&[]).await.unwrap().is_empty());
        let found = repo.find_by_movie_ids(&[2, 99]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].movie_id, 2);
    }
}
