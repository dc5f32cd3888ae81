//! Catalog access configuration.

use chrono::Duration;
use reqwest::Url;
use thiserror::Error;

use storefront_catalog::{DEFAULT_PLACEHOLDER_URL, ImageUrlResolver};

pub const API_URL_VAR: &str = "CATALOG_API_URL";
pub const MEDIA_URL_VAR: &str = "CATALOG_MEDIA_URL";
pub const API_TOKEN_VAR: &str = "CATALOG_API_TOKEN";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} is not a usable http(s) URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },
}

/// Maximum age of a cached response per query before it is refetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessBudgets {
    pub products: Duration,
    pub product_by_slug: Duration,
    pub categories: Duration,
    pub product_slugs: Duration,
}

impl Default for StalenessBudgets {
    fn default() -> Self {
        Self {
            products: Duration::hours(1),
            product_by_slug: Duration::hours(1),
            categories: Duration::hours(2),
            product_slugs: Duration::hours(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// CMS origin; the `/api/...` paths are appended to it.
    pub api_url: Url,
    /// Origin for relative image URLs. Usually the same host as `api_url`.
    pub media_url: String,
    pub api_token: Option<String>,
    pub placeholder_url: String,
    pub budgets: StalenessBudgets,
}

impl CatalogConfig {
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        let api_url = parse_http_url(API_URL_VAR, api_url)?;
        let media_url = api_url.as_str().trim_end_matches('/').to_string();
        Ok(Self {
            api_url,
            media_url,
            api_token: None,
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
            budgets: StalenessBudgets::default(),
        })
    }

    /// Read `CATALOG_API_URL` (required), `CATALOG_MEDIA_URL` and
    /// `CATALOG_API_TOKEN` (optional) from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_url = non_empty(API_URL_VAR).ok_or(ConfigError::Missing(API_URL_VAR))?;
        let mut config = Self::new(api_url.trim())?;

        if let Some(media) = non_empty(MEDIA_URL_VAR) {
            config = config.with_media_url(&media)?;
        }
        if let Some(token) = non_empty(API_TOKEN_VAR) {
            config = config.with_token(token.trim());
        }
        Ok(config)
    }

    pub fn with_media_url(mut self, media_url: &str) -> Result<Self, ConfigError> {
        let url = parse_http_url(MEDIA_URL_VAR, media_url)?;
        self.media_url = url.as_str().trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_budgets(mut self, budgets: StalenessBudgets) -> Self {
        self.budgets = budgets;
        self
    }

    pub fn resolver(&self) -> ImageUrlResolver {
        ImageUrlResolver::new(self.media_url.clone()).with_placeholder(self.placeholder_url.clone())
    }
}

fn parse_http_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        var,
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            var,
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}
