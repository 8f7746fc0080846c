use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::models::MovieType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            _ => Self::Dev,
        }
    }

    /// Returns the default data path for this environment
    pub fn default_data_path(&self) -> PathBuf {
        match self {
            Self::Dev => PathBuf::from("./data"),
            Self::Prod => PathBuf::from("/data"),
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

/// Upstream catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubanSettings {
    pub base_url: String,
    /// City filter for the in-theaters list
    pub city: String,
    pub recent_path: String,
    pub top_path: String,
    /// Items requested per list page
    pub page_size: u32,
    /// Upper bound on items pulled per curated list
    pub max_items: u32,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for DoubanSettings {
    fn default() -> Self {
        Self {
            base_url: douban::DEFAULT_BASE_URL.to_string(),
            city: "上海".to_string(),
            recent_path: "/v2/movie/in_theaters".to_string(),
            top_path: "/v2/movie/top250".to_string(),
            page_size: 50,
            max_items: 100,
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl DoubanSettings {
    /// List endpoint for a curated category; `Normal` has none
    pub fn list_path(&self, movie_type: MovieType) -> Option<&str> {
        match movie_type {
            MovieType::Recent => Some(&self.recent_path),
            MovieType::Top => Some(&self.top_path),
            MovieType::Normal => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Concurrent detail fetches
    pub workers: usize,
    pub interval_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            workers: 2,
            interval_secs: 6 * 60 * 60,
        }
    }
}

impl SyncSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub env: Environment,
    pub data_path: PathBuf,
    pub database_url: String,
    pub max_connections: u32,
    pub douban: DoubanSettings,
    pub sync: SyncSettings,
}

impl Config {
    pub fn new(env: Environment, data_path: impl AsRef<Path>) -> Self {
        let data_path = data_path.as_ref().to_path_buf();
        let database_url = format!(
            "sqlite:{}?mode=rwc",
            data_path.join("filmdeck.db").display()
        );
        Self {
            env,
            data_path,
            database_url,
            max_connections: 5,
            douban: DoubanSettings::default(),
            sync: SyncSettings::default(),
        }
    }

    /// Build the config from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build the config from a variable lookup.
    ///
    /// Unset variables fall back to defaults; set but unparsable numbers are errors.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Environment::from_str(&var("APP_ENV").unwrap_or_default());
        let data_path = var("DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| env.default_data_path());
        let mut config = Self::new(env, data_path);

        if let Some(base_url) = var("DOUBAN_BASE_URL") {
            config.douban.base_url = base_url;
        }
        if let Some(city) = var("DOUBAN_CITY") {
            config.douban.city = city;
        }
        parse_var(&var, "SYNC_PAGE_SIZE", &mut config.douban.page_size)?;
        parse_var(&var, "SYNC_MAX_ITEMS", &mut config.douban.max_items)?;
        parse_var(&var, "HTTP_TIMEOUT_SECS", &mut config.douban.timeout_secs)?;
        parse_var(&var, "SYNC_WORKERS", &mut config.sync.workers)?;
        parse_var(&var, "SYNC_INTERVAL_SECS", &mut config.sync.interval_secs)?;

        if config.sync.workers == 0 {
            return Err(ConfigError::InvalidValue {
                name: "SYNC_WORKERS",
                value: "0".to_string(),
            });
        }
        if config.douban.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "SYNC_PAGE_SIZE",
                value: "0".to_string(),
            });
        }
        if config.douban.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "HTTP_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        Ok(config)
    }
}

fn parse_var<F, T>(var: &F, name: &'static str, target: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(value) = var(name) {
        *target = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value })?;
    }
    Ok(())
}
