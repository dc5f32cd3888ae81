//! Storefront service configuration, read once at startup.

use std::net::SocketAddr;

use thiserror::Error;

use storefront_client::{CatalogConfig, ConfigError};

pub const ADDR_VAR: &str = "STOREFRONT_ADDR";
pub const CURRENCY_VAR: &str = "STOREFRONT_CURRENCY";
pub const REVALIDATE_SECRET_VAR: &str = "STOREFRONT_REVALIDATE_SECRET";

pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_CURRENCY: &str = "PKR";

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error(transparent)]
    Catalog(#[from] ConfigError),
    #[error("STOREFRONT_ADDR is not a socket address: {0}")]
    InvalidAddr(String),
}

#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub catalog: CatalogConfig,
    pub addr: SocketAddr,
    pub currency: String,
    /// `POST /revalidate` is only mounted when this is set.
    pub revalidate_secret: Option<String>,
}

impl StorefrontConfig {
    pub fn from_env() -> Result<Self, AppConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppConfigError> {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let catalog = CatalogConfig::from_lookup(&lookup)?;

        let raw_addr = non_empty(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|e| AppConfigError::InvalidAddr(format!("{raw_addr:?}: {e}")))?;

        Ok(Self {
            catalog,
            addr,
            currency: non_empty(CURRENCY_VAR).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            revalidate_secret: non_empty(REVALIDATE_SECRET_VAR),
        })
    }
}
