use reqwest::Client;

use crate::error::DoubanError;

pub const DEFAULT_BASE_URL: &str = "https://douban.uieee.com";

/// Douban API client.
///
/// Holds a cloned handle to a shared `reqwest::Client`; timeouts are whatever
/// that client was built with.
pub struct DoubanClient {
    client: Client,
    base_url: String,
}

impl DoubanClient {
    /// Create a DoubanClient against the public mirror.
    pub fn with_client(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Create a DoubanClient against a custom mirror.
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> crate::Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(DoubanError::Api {
                status_code: status.as_u16(),
                message: body,
            });
        }
        let deserializer = &mut serde_json::Deserializer::from_str(&body);
        serde_path_to_error::deserialize(deserializer).map_err(|e| DoubanError::Json {
            path: e.path().to_string(),
            source: e.into_inner(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subject;

    fn response(status: u16, body: &str) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .body(body.to_string())
            .unwrap()
            .into()
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = DoubanClient::with_base_url(Client::new(), "http://localhost:8080/");
        assert_eq!(
            client.url("/v2/movie/subject/1"),
            "http://localhost:8080/v2/movie/subject/1"
        );
    }

    #[tokio::test]
    async fn test_handle_response_non_success() {
        let client = DoubanClient::with_client(Client::new());
        let result: crate::Result<Subject> = client
            .handle_response(response(404, r#"{"msg":"movie_not_found"}"#))
            .await;

        match result {
            Err(DoubanError::Api {
                status_code,
                message,
            }) => {
                assert_eq!(status_code, 404);
                assert!(message.contains("movie_not_found"));
            }
            other => panic!("expected Api error, got {:?}", other.map(|s| s.id)),
        }
    }

    #[tokio::test]
    async fn test_handle_response_reports_json_path() {
        let client = DoubanClient::with_client(Client::new());
        let body = r#"{"id": "1292052", "title": "肖申克的救赎", "rating": {"average": "high"}}"#;
        let result: crate::Result<Subject> = client.handle_response(response(200, body)).await;

        match result {
            Err(DoubanError::Json { path, .. }) => assert_eq!(path, "rating.average"),
            other => panic!("expected Json error, got {:?}", other.map(|s| s.id)),
        }
    }

    #[tokio::test]
    async fn test_handle_response_ok() {
        let client = DoubanClient::with_client(Client::new());
        let body = r#"{"id": "1292052", "title": "肖申克的救赎", "year": "1994"}"#;
        let subject: Subject = client.handle_response(response(200, body)).await.unwrap();
        assert_eq!(subject.id, 1292052);
        assert_eq!(subject.year, Some(1994));
    }
}
