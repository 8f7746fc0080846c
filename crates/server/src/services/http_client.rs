use reqwest::Client;

use crate::config::DoubanSettings;

const USER_AGENT: &str = concat!("filmdeck/", env!("CARGO_PKG_VERSION"));

/// Build the process-wide HTTP client.
///
/// Every request made through it is bounded by the configured timeouts.
pub fn build_http_client(settings: &DoubanSettings) -> Result<Client, reqwest::Error> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(settings.timeout())
        .connect_timeout(settings.connect_timeout())
        .build()?;

    tracing::debug!(
        "HTTP client initialized (timeout {}s, connect timeout {}s)",
        settings.timeout_secs,
        settings.connect_timeout_secs
    );

    Ok(client)
}
