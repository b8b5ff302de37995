//! HTTP client for a Prismic-style content repository

use async_trait::async_trait;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::{ApiInfo, ContentSource, Query, SearchResponse};
use crate::config::ApiConfig;
use crate::error::{BlogError, Result};

/// Client for the repository's REST API (`/api/v2`)
pub struct PrismicClient {
    endpoint: String,
    access_token: Option<String>,
    client: reqwest::Client,
    master_ref: RefCache,
}

/// Master ref reused until it is older than `ttl`
///
/// The repository publishes under a new master ref, so a long-lived client
/// has to read the API root again to see new content.
struct RefCache {
    ttl: Duration,
    current: Mutex<Option<(String, Instant)>>,
}

impl RefCache {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            current: Mutex::new(None),
        }
    }

    async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        // Held across the fetch so concurrent callers share one request
        let mut current = self.current.lock().await;
        if let Some((reference, fetched_at)) = current.as_ref() {
            if fetched_at.elapsed() < self.ttl {
                return Ok(reference.clone());
            }
        }

        let reference = fetch().await?;
        *current = Some((reference.clone(), Instant::now()));
        Ok(reference)
    }
}

impl PrismicClient {
    /// Create a client from the API configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("ignite-blog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            client,
            master_ref: RefCache::new(Duration::from_secs(config.ref_ttl_secs)),
        })
    }

    /// Ref of the published content, re-read once the cached one expires
    pub async fn master_ref(&self) -> Result<String> {
        self.master_ref.get_or_fetch(|| self.fetch_master_ref()).await
    }

    async fn fetch_master_ref(&self) -> Result<String> {
        let mut request = self.client.get(&self.endpoint);
        if let Some(token) = &self.access_token {
            request = request.query(&[("access_token", token)]);
        }
        let response = request.send().await?;
        let info: ApiInfo = Self::check(response).await?.json().await?;
        let master = info
            .master_ref()
            .ok_or_else(|| BlogError::Api {
                status: 200,
                message: "API root lists no master ref".to_string(),
            })?
            .to_string();
        tracing::debug!("Master ref: {}", master);
        Ok(master)
    }

    fn search_url(&self) -> String {
        format!("{}/documents/search", self.endpoint)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(BlogError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ContentSource for PrismicClient {
    async fn query(&self, query: &Query) -> Result<SearchResponse> {
        let reference = match &query.reference {
            Some(r) => r.clone(),
            None => self.master_ref().await?,
        };

        let mut params = query.to_params();
        params.push(("ref", reference));
        if let Some(token) = &self.access_token {
            params.push(("access_token", token.clone()));
        }

        tracing::debug!("Querying {}?{}", self.search_url(), query.to_query_string());
        let response = self.client.get(self.search_url()).query(&params).send().await?;
        let page: SearchResponse = Self::check(response).await?.json().await?;
        Ok(page)
    }
}
