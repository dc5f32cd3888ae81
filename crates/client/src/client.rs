use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;

use storefront_catalog::{Category, ImageUrlResolver, Product};

use crate::cache::{Clock, ResponseCache, SystemClock};
use crate::config::{CatalogConfig, StalenessBudgets};
use crate::request::CatalogRequest;
use crate::transport::{CatalogTransport, HttpTransport, TransportError};
use crate::wire::{Envelope, WireCategory, WireProduct, WireSlug};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read access to the catalog.
///
/// The `try_*` methods surface upstream failures. The plain methods are what
/// pages use: they log the failure and degrade to an empty list or `None`, so
/// a CMS outage renders an empty catalog instead of an error page.
///
/// Responses are cached per request URL for the query's staleness budget.
/// Failed or undecodable responses are never cached.
#[derive(Clone)]
pub struct CatalogClient {
    base_url: Url,
    budgets: StalenessBudgets,
    resolver: ImageUrlResolver,
    transport: Arc<dyn CatalogTransport>,
    cache: Arc<ResponseCache>,
}

impl CatalogClient {
    /// Client talking HTTP to `config.api_url`.
    pub fn new(config: &CatalogConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new(config.api_token.clone())))
    }

    pub fn with_transport(config: &CatalogConfig, transport: Arc<dyn CatalogTransport>) -> Self {
        Self {
            base_url: config.api_url.clone(),
            budgets: config.budgets,
            resolver: config.resolver(),
            transport,
            cache: Arc::new(ResponseCache::new(Arc::new(SystemClock))),
        }
    }

    /// Replace the staleness clock. Starts from an empty cache.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.cache = Arc::new(ResponseCache::new(clock));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn resolver(&self) -> &ImageUrlResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Purge cached responses stored under `tag`.
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        let purged = self.cache.invalidate_tag(tag);
        tracing::info!(tag, purged, "cache tag invalidated");
        purged
    }

    pub async fn try_list_products(&self) -> Result<Vec<Product>, FetchError> {
        let records: Vec<WireProduct> = self.fetch(&CatalogRequest::list_products()).await?;
        Ok(records.into_iter().map(Product::from).collect())
    }

    /// Every product in upstream order; empty on any failure.
    pub async fn list_products(&self) -> Vec<Product> {
        let result = self.try_list_products().await;
        self.or_empty(&CatalogRequest::list_products(), result)
    }

    /// First record matching `slug`, if any.
    pub async fn try_get_product_by_slug(&self, slug: &str) -> Result<Option<Product>, FetchError> {
        let records: Vec<WireProduct> = self.fetch(&CatalogRequest::product_by_slug(slug)).await?;
        Ok(records.into_iter().next().map(Product::from))
    }

    /// `None` both when no product has this slug and when the fetch fails.
    pub async fn get_product_by_slug(&self, slug: &str) -> Option<Product> {
        let result = self.try_get_product_by_slug(slug).await;
        self.or_empty(&CatalogRequest::product_by_slug(slug), result)
    }

    pub async fn try_list_categories(&self) -> Result<Vec<Category>, FetchError> {
        let records: Vec<WireCategory> = self.fetch(&CatalogRequest::list_categories()).await?;
        Ok(records.into_iter().map(Category::from).collect())
    }

    pub async fn list_categories(&self) -> Vec<Category> {
        let result = self.try_list_categories().await;
        self.or_empty(&CatalogRequest::list_categories(), result)
    }

    /// Slugs of every product, for pre-rendering detail pages. Records
    /// without a slug are skipped.
    pub async fn try_list_product_slugs(&self) -> Result<Vec<String>, FetchError> {
        let records: Vec<WireSlug> = self.fetch(&CatalogRequest::list_product_slugs()).await?;
        Ok(records.into_iter().filter_map(WireSlug::into_slug).collect())
    }

    pub async fn list_product_slugs(&self) -> Vec<String> {
        let result = self.try_list_product_slugs().await;
        self.or_empty(&CatalogRequest::list_product_slugs(), result)
    }

    /// Log a failed query and fall back to the empty value.
    fn or_empty<T: Default>(&self, request: &CatalogRequest, result: Result<T, FetchError>) -> T {
        result.unwrap_or_else(|err| {
            tracing::error!(
                operation = %request.operation(),
                url = %request.url(&self.base_url),
                "catalog query failed: {err}"
            );
            T::default()
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: &CatalogRequest) -> Result<Vec<T>, FetchError> {
        let url = request.url(&self.base_url);
        let operation = request.operation();

        if let Some(body) = self.cache.get(url.as_str()) {
            tracing::debug!(%operation, "catalog cache hit");
            return Ok(serde_json::from_str::<Envelope<T>>(&body)?.into_records());
        }

        tracing::debug!(%operation, url = %url, "fetching from catalog");
        let body = self.transport.get(&url).await?;
        let records = serde_json::from_str::<Envelope<T>>(&body)?.into_records();

        self.cache.insert(
            url.as_str(),
            request.tag(),
            Arc::from(body),
            operation.budget(&self.budgets),
        );
        Ok(records)
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.base_url.as_str())
            .field("budgets", &self.budgets)
            .field("resolver", &self.resolver)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
