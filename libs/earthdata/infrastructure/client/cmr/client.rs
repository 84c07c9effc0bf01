use super::types::{GranuleEntry, GranuleFeedResponse};
use crate::domain::{DataLink, GranuleQuery};
use async_trait::async_trait;
use futures::{stream, StreamExt, TryStreamExt};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

/// CMR API endpoint (operations)
pub const CMR_OPS: &str = "https://cmr.earthdata.nasa.gov/search";

/// Response header carrying the total number of matching granules
pub const HITS_HEADER: &str = "CMR-Hits";

const DEFAULT_MAX_CONCURRENT_PAGES: usize = 4;

#[derive(Error, Debug)]
pub enum CmrError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Deserialization failed: {0}")]
    DeserializeFailed(String),

    #[error("Response is missing a valid CMR-Hits header")]
    MissingHits,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

pub type Result<T> = std::result::Result<T, CmrError>;

/// Source of granule data links
///
/// Implemented by [`CmrClient`]; the fetch use case only depends on this.
#[async_trait]
pub trait GranuleCatalog: Send + Sync {
    /// All HTTPS `.h5` data links for granules matching the query
    async fn data_links(&self, query: &GranuleQuery) -> Result<Vec<DataLink>>;
}

/// CMR granule search client
pub struct CmrClient {
    base_url: String,
    client: Client,
    max_concurrent_pages: usize,
}

impl CmrClient {
    /// Create new CMR client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            max_concurrent_pages: DEFAULT_MAX_CONCURRENT_PAGES,
        }
    }

    /// Limit how many result pages are requested at once
    pub fn with_max_concurrent_pages(mut self, pages: usize) -> Self {
        self.max_concurrent_pages = pages.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Total number of granules matching the query
    pub async fn granule_hits(&self, query: &GranuleQuery) -> Result<usize> {
        let url = format!("{}/granules", self.base_url);
        let params = query.to_query_params();

        debug!("GET {} with {} params", url, params.len());

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::check_status(response, &query.collections).await?;

        let hits = response
            .headers()
            .get(HITS_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<usize>().ok())
            .ok_or(CmrError::MissingHits)?;

        debug!(hits = hits, "CMR hit count");
        Ok(hits)
    }

    /// Fetch a single page (1-based) of granule entries
    pub async fn get_granules_page(
        &self,
        query: &GranuleQuery,
        page_num: usize,
    ) -> Result<Vec<GranuleEntry>> {
        let url = format!("{}/granules.json", self.base_url);

        let mut params = query.to_query_params();
        params.push(("page_num".to_string(), page_num.to_string()));

        debug!("Fetching page: page_num={}, page_size={}", page_num, query.page_size);

        let response = self.client.get(&url).query(&params).send().await?;
        let response = Self::check_status(response, &query.collections).await?;

        let body: GranuleFeedResponse = response
            .json()
            .await
            .map_err(|e| CmrError::DeserializeFailed(e.to_string()))?;

        debug!("Fetched {} granules in page {}", body.feed.entry.len(), page_num);
        Ok(body.feed.entry)
    }

    /// Fetch every page for the query, concurrently, keeping page order
    pub async fn get_all_granules(&self, query: &GranuleQuery) -> Result<Vec<GranuleEntry>> {
        let hits = self.granule_hits(query).await?;
        let pages = query.page_count(hits);

        info!(
            hits = hits,
            pages = pages,
            page_size = query.page_size,
            "Starting paginated granule fetch"
        );

        if pages == 0 {
            return Ok(Vec::new());
        }

        let per_page: Vec<Vec<GranuleEntry>> = stream::iter(1..=pages)
            .map(|page_num| self.get_granules_page(query, page_num))
            .buffered(self.max_concurrent_pages)
            .try_collect()
            .await?;

        let entries: Vec<GranuleEntry> = per_page.into_iter().flatten().collect();

        info!("Fetched total of {} granules", entries.len());
        Ok(entries)
    }

    /// Keep HTTPS `.h5` links, in feed order, first occurrence wins
    pub fn extract_data_links(entries: &[GranuleEntry]) -> Vec<DataLink> {
        let mut seen = HashSet::new();

        entries
            .iter()
            .flat_map(|entry| entry.links.iter())
            .map(|link| DataLink::new(link.href.clone()))
            .filter(|link| link.is_h5_data())
            .filter(|link| seen.insert(link.href.clone()))
            .collect()
    }

    async fn check_status(response: Response, collections: &[String]) -> Result<Response> {
        let status = response.status();

        if status == 429 {
            warn!("Rate limit exceeded");
            return Err(CmrError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CmrError::ApiError(format!(
                "Request for collections {:?} failed ({}): {}",
                collections, status, error_text
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl GranuleCatalog for CmrClient {
    async fn data_links(&self, query: &GranuleQuery) -> Result<Vec<DataLink>> {
        let entries = self.get_all_granules(query).await?;
        Ok(Self::extract_data_links(&entries))
    }
}
