//! Remote recommendation source
//!
//! Calls a serving instance's `GET /recommend?movie_name=...` endpoint. The item
//! name goes through `RequestBuilder::query`, which percent-encodes it.

use std::time::Duration;

use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};

use crate::{
    error::{AppError, AppResult},
    models::RecommendationResponse,
    services::providers::RecommendationSource,
};

#[derive(Clone)]
pub struct HttpSource {
    http_client: HttpClient,
    endpoint: String,
}

impl HttpSource {
    /// Creates a client for the service at `base_url` (e.g. `http://host:3000`)
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            endpoint: format!("{}/recommend", base_url.trim_end_matches('/')),
        })
    }

    fn request(&self, item_name: &str) -> RequestBuilder {
        self.http_client
            .get(&self.endpoint)
            .query(&[("movie_name", item_name)])
    }
}

#[async_trait::async_trait]
impl RecommendationSource for HttpSource {
    async fn recommend(&self, item_name: &str) -> AppResult<Vec<String>> {
        let response = self.request(item_name).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(AppError::NotFound(item_name.to_string())),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::ExternalApi(format!(
                    "Recommendation API returned status {}: {}",
                    status, body
                )))
            }
            _ => {
                let body: RecommendationResponse = response.json().await?;
                tracing::debug!(
                    item = %item_name,
                    returned = body.recommended_items.len(),
                    "Fetched remote recommendations"
                );
                Ok(body.recommended_items)
            }
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> HttpSource {
        HttpSource::new("http://localhost:3000/", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        assert_eq!(source().endpoint, "http://localhost:3000/recommend");
    }

    #[test]
    fn test_item_name_is_percent_encoded() {
        let request = source()
            .request("Amélie & Friends (2001)")
            .build()
            .unwrap();

        assert_eq!(
            request.url().query(),
            Some("movie_name=Am%C3%A9lie+%26+Friends+%282001%29")
        );
        let (key, value) = request.url().query_pairs().next().unwrap();
        assert_eq!(key, "movie_name");
        assert_eq!(value, "Amélie & Friends (2001)");
    }

    #[test]
    fn test_upstream_body_accepts_legacy_field_name() {
        let body: RecommendationResponse =
            serde_json::from_str(r#"{"recommended_movies":["Heat (1995)"]}"#).unwrap();
        assert_eq!(body.recommended_items, vec!["Heat (1995)"]);
    }
}
