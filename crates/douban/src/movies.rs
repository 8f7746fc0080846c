use crate::{
    models::{Subject, SubjectList},
    DoubanClient,
};

/// Paging and filter parameters for list endpoints
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub start: u32,
    pub count: u32,
    /// Only meaningful for `in_theaters`
    pub city: Option<String>,
}

impl DoubanClient {
    /// Fetch one page of a curated list, e.g. `/v2/movie/top250`.
    pub async fn list_subjects(&self, path: &str, params: &ListParams) -> crate::Result<SubjectList> {
        let url = self.url(path);
        tracing::debug!("Fetching Douban list {} (start={}, count={})", url, params.start, params.count);

        let mut request = self.client().get(&url).query(&[
            ("start", params.start.to_string()),
            ("count", params.count.to_string()),
        ]);

        if let Some(city) = &params.city {
            request = request.query(&[("city", city.as_str())]);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Fetch full detail for a subject
    pub async fn get_subject(&self, id: i64) -> crate::Result<Subject> {
        let url = self.url(&format!("/v2/movie/subject/{}", id));
        let response = self.client().get(&url).send().await?;
        self.handle_response(response).await
    }
}
