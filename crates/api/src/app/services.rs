//! Runtime wiring shared by every route.

use storefront_catalog::Magnifier;
use storefront_client::CatalogClient;

use crate::config::{DEFAULT_CURRENCY, StorefrontConfig};

#[derive(Debug, Clone)]
pub struct AppServices {
    pub catalog: CatalogClient,
    /// Currency code prefixed to displayed prices.
    pub currency: String,
    pub magnifier: Magnifier,
}

impl AppServices {
    pub fn new(catalog: CatalogClient) -> Self {
        Self {
            catalog,
            currency: DEFAULT_CURRENCY.to_string(),
            magnifier: Magnifier::default(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

/// Production services: HTTP transport against the configured CMS.
pub fn build_services(config: &StorefrontConfig) -> AppServices {
    AppServices::new(CatalogClient::new(&config.catalog)).with_currency(config.currency.clone())
}
