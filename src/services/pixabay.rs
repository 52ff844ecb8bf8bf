//! Pixabay image-search client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Config;
use crate::error::{Result, SiteError};
use crate::log_debug;
use crate::types::{ImageSearchParams, ImageType, Orientation};

const SERVICE: &str = "Pixabay";

/// Search response body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixabayResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_hits: Option<u64>,
    #[serde(default)]
    pub hits: Vec<PixabayHit>,
}

/// One search hit; only the fields the image agent reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixabayHit {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "webformatURL", default)]
    pub webformat_url: String,
    #[serde(rename = "webformatWidth", default)]
    pub webformat_width: u32,
    #[serde(rename = "webformatHeight", default)]
    pub webformat_height: u32,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub user: String,
}

/// Image-search backend used by the image agent
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Whether an API key is configured
    fn has_credentials(&self) -> bool;

    async fn search(&self, params: &ImageSearchParams) -> Result<PixabayResponse>;
}

pub struct PixabayClient {
    client: Client,
    api_key: String,
    base_url: String,
    max_images: u32,
}

impl PixabayClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, max_images: u32) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            max_images,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.images.api_key.clone(),
            config.images.base_url.clone(),
            config.images.max_images,
        )
    }

    /// Full request URL for a search, key included
    pub fn search_url(&self, params: &ImageSearchParams) -> Result<Url> {
        let per_page = params.count.unwrap_or(self.max_images).to_string();
        let min_width = params.min_width.unwrap_or(0).to_string();
        let min_height = params.min_height.unwrap_or(0).to_string();

        let mut query = vec![
            ("key", self.api_key.as_str()),
            ("q", params.query.as_str()),
            ("per_page", per_page.as_str()),
            (
                "image_type",
                params.image_type.unwrap_or(ImageType::All).as_str(),
            ),
            (
                "orientation",
                params.orientation.unwrap_or(Orientation::All).as_str(),
            ),
            ("min_width", min_width.as_str()),
            ("min_height", min_height.as_str()),
            ("safesearch", "true"),
        ];
        if let Some(category) = params.category.as_deref() {
            query.push(("category", category));
        }

        Url::parse_with_params(&self.base_url, &query)
            .map_err(|e| SiteError::InvalidInput(format!("Invalid image API URL: {e}")))
    }
}

#[async_trait]
impl ImageSearch for PixabayClient {
    fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn search(&self, params: &ImageSearchParams) -> Result<PixabayResponse> {
        let url = self.search_url(params)?;
        log_debug!("Searching {} for '{}'", SERVICE, params.query);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SiteError::transport(SERVICE, e))?;

        if !response.status().is_success() {
            return Err(SiteError::Upstream {
                service: SERVICE,
                status: response.status().as_u16(),
            });
        }

        let body: PixabayResponse = response
            .json()
            .await
            .map_err(|e| SiteError::malformed(SERVICE, e.to_string()))?;

        log_debug!(
            "{} returned {} hits (totalHits {:?})",
            SERVICE,
            body.hits.len(),
            body.total_hits
        );
        Ok(body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> PixabayClient {
        PixabayClient::new("secret", "https://pixabay.com/api/", 5)
    }

    #[test]
    fn test_search_url_defaults() {
        let url = client()
            .search_url(&ImageSearchParams::new("mountain lake"))
            .unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |k: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("key"), Some("secret"));
        assert_eq!(get("q"), Some("mountain lake"));
        assert_eq!(get("per_page"), Some("5"));
        assert_eq!(get("image_type"), Some("all"));
        assert_eq!(get("orientation"), Some("all"));
        assert_eq!(get("min_width"), Some("0"));
        assert_eq!(get("min_height"), Some("0"));
        assert_eq!(get("safesearch"), Some("true"));
        assert_eq!(get("category"), None);
    }

    #[test]
    fn test_search_url_overrides() {
        let mut params = ImageSearchParams::new("cats")
            .with_count(Some(3))
            .with_image_type(Some(ImageType::Photo));
        params.category = Some("animals".to_string());
        params.orientation = Some(Orientation::Horizontal);

        let url = client().search_url(&params).unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("per_page=3"));
        assert!(query.contains("image_type=photo"));
        assert!(query.contains("orientation=horizontal"));
        assert!(query.ends_with("category=animals"));
    }

    #[test]
    fn test_credentials() {
        assert!(client().has_credentials());
        assert!(!PixabayClient::new("", "https://pixabay.com/api/", 5).has_credentials());
    }

    #[test]
    fn test_response_decoding() {
        let body = r#"{"total": 120, "totalHits": 40, "hits": [
            {"id": 1, "webformatURL": "https://cdn.example/a.jpg",
             "webformatWidth": 640, "webformatHeight": 427,
             "tags": "lake, mountain", "user": "alice", "likes": 3}
        ]}"#;
        let response: PixabayResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.total_hits, Some(40));
        assert_eq!(response.hits[0].webformat_width, 640);
        assert_eq!(response.hits[0].user, "alice");
    }
}
