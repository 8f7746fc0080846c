use thiserror::Error;

use crate::config::ConfigError;
use crate::db::DatabaseError;
use crate::models::UnknownMovieType;
use crate::services::MovieError;

/// Top-level error for running the application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Database(#[from] DatabaseError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("{0}")]
    Movie(#[from] MovieError),

    #[error("{0}")]
    InvalidArgument(#[from] UnknownMovieType),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
