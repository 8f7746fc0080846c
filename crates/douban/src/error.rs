use thiserror::Error;

#[derive(Debug, Error)]
pub enum DoubanError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Douban API returned {status_code}: {message}")]
    Api { status_code: u16, message: String },

    #[error("Failed to decode response at `{path}`: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}
