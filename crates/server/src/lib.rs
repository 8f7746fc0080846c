//! Film catalog sync.
//!
//! Pulls curated movie lists from Douban into SQLite, keeps stored films in
//! step with those lists and fills in per-film detail in the background.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;

pub use config::{Config, DoubanSettings, Environment, SyncSettings};
pub use db::{create_memory_pool, create_pool};
pub use error::{AppError, AppResult};
pub use models::{CatalogItem, Film, MovieType};
pub use services::{MovieService, SyncReport};
pub use state::AppState;

/// Open the database and build the application state
pub async fn bootstrap(config: Config) -> AppResult<AppState> {
    std::fs::create_dir_all(&config.data_path)?;
    let pool = create_pool(&config.database_url, config.max_connections).await?;
    Ok(AppState::new(pool, config)?)
}
