//! Acemap work search client.

use moka::future::Cache;
use reqwest_middleware::ClientWithMiddleware;

use super::PaperSearch;
use crate::client::{self, HttpSettings};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{AcemapResponse, SearchPage};

/// Acemap rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Client for `GET {search_api_url}?keyword=..&page=1&size=..&order=desc`.
#[derive(Clone)]
pub struct AcemapClient {
    client: ClientWithMiddleware,
    cache: Cache<String, serde_json::Value>,
    url: String,
    timeout: std::time::Duration,
}

impl AcemapClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );

        let client = client::build_client(HttpSettings {
            headers,
            timeout: config.search_timeout,
            connect_timeout: config.connect_timeout,
            max_retries: config.max_retries,
        })?;

        let cache = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            client,
            cache,
            url: config.search_api_url.clone(),
            timeout: config.search_timeout,
        })
    }

    async fn fetch(&self, params: &[(&str, String)]) -> ClientResult<serde_json::Value> {
        let cache_key = client::cache_key("GET", &self.url, params);
        if let Some(cached) = self.cache.get(&cache_key).await {
            return Ok(cached);
        }

        let response = self
            .client
            .get(&self.url)
            .query(params)
            .send()
            .await
            .map_err(|e| client::send_error(e, self.timeout))?;

        let response = client::check_status(response).await?;
        let value: serde_json::Value = response.json().await?;

        self.cache.insert(cache_key, value.clone()).await;
        Ok(value)
    }
}

#[async_trait::async_trait]
impl PaperSearch for AcemapClient {
    async fn search(&self, keyword: &str, limit: usize) -> ClientResult<SearchPage> {
        if keyword.trim().is_empty() {
            return Ok(SearchPage::empty());
        }

        let params = [
            ("keyword", keyword.to_string()),
            ("page", "1".to_string()),
            ("size", limit.to_string()),
            ("order", "desc".to_string()),
        ];

        let value = self.fetch(&params).await?;
        let response: AcemapResponse = serde_json::from_value(value).map_err(ClientError::from)?;
        let page = SearchPage::from(response);

        tracing::debug!(keyword, total = page.total, returned = page.records.len(), "Acemap search");
        Ok(page)
    }
}

impl std::fmt::Debug for AcemapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcemapClient").field("url", &self.url).finish_non_exhaustive()
    }
}
