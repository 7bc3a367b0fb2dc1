//! HTTP transport for the CMS API
//!
//! The real client talks to `https://{service_domain}.microcms.io/api/v1/`
//! with the API key in a request header. The [`CmsClient`] trait exists so
//! the gateway can be driven by an in-memory double in tests, without any
//! environment mutation.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use super::model::CmsList;
use crate::config::CmsConfig;

/// Upper bound the CMS enforces on `limit`; the gateway enforces it
/// locally as well so callers can pass any value.
pub const MAX_LIMIT: usize = 100;

const API_KEY_HEADER: &str = "X-MICROCMS-API-KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the CMS transport
#[derive(Debug, Error)]
pub enum CmsError {
    /// Direct content lookup hit a missing id; distinct from other
    /// failures so the slug-or-id fallback can treat it as "no post"
    #[error("content not found")]
    NotFound,

    #[error("cms request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cms returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid cms url: {0}")]
    BadUrl(#[from] url::ParseError),

    #[error("failed to decode cms response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Query parameters for a CMS list endpoint
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub orders: Option<String>,
    pub filters: Option<String>,
    pub fields: Option<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size, clamped to [`MAX_LIMIT`]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit.min(MAX_LIMIT));
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Result ordering, e.g. `-publishedAt` for newest first
    pub fn orders(mut self, orders: impl Into<String>) -> Self {
        self.orders = Some(orders.into());
        self
    }

    /// Server-side filter expression, e.g. `category[equals]{id}`
    pub fn filters(mut self, filters: impl Into<String>) -> Self {
        self.filters = Some(filters.into());
        self
    }

    /// Field projection, e.g. `id,slug`
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        if let Some(orders) = &self.orders {
            params.push(("orders", orders.clone()));
        }
        if let Some(filters) = &self.filters {
            params.push(("filters", filters.clone()));
        }
        if let Some(fields) = &self.fields {
            params.push(("fields", fields.clone()));
        }
        params
    }
}

/// Transport abstraction over the CMS API
pub trait CmsClient: Send + Sync {
    /// Fetch a page of a collection endpoint
    fn list<T>(
        &self,
        endpoint: &str,
        query: &ListQuery,
    ) -> impl Future<Output = Result<CmsList<T>, CmsError>> + Send
    where
        T: DeserializeOwned + Send;

    /// Fetch a single content item by its id
    fn get<T>(
        &self,
        endpoint: &str,
        content_id: &str,
    ) -> impl Future<Output = Result<T, CmsError>> + Send
    where
        T: DeserializeOwned + Send;
}

/// reqwest-backed CMS client
#[derive(Debug, Clone)]
pub struct MicroCmsClient {
    base: Url,
    api_key: String,
    http: reqwest::Client,
}

impl MicroCmsClient {
    /// Build a client from validated credentials
    pub fn new(config: &CmsConfig) -> Result<Self, CmsError> {
        let base = Url::parse(&format!(
            "https://{}.microcms.io/api/v1/",
            config.service_domain
        ))?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base,
            api_key: config.api_key.clone(),
            http,
        })
    }

    async fn request<T: DeserializeOwned>(&self, url: Url) -> Result<T, CmsError> {
        tracing::debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CmsError::NotFound);
        }
        if !status.is_success() {
            return Err(CmsError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl CmsClient for MicroCmsClient {
    fn list<T>(
        &self,
        endpoint: &str,
        query: &ListQuery,
    ) -> impl Future<Output = Result<CmsList<T>, CmsError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        let url = self.base.join(endpoint).map(|mut url| {
            for (key, value) in query.params() {
                url.query_pairs_mut().append_pair(key, &value);
            }
            url
        });
        async move { self.request(url?).await }
    }

    fn get<T>(
        &self,
        endpoint: &str,
        content_id: &str,
    ) -> impl Future<Output = Result<T, CmsError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        let url = self.base.join(&format!("{}/{}", endpoint, content_id));
        async move { self.request(url?).await }
    }
}
