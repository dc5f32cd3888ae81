//! Listing page logic: category filter and price sort.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use storefront_core::{CategoryId, DomainError, Price};

use crate::product::Product;

/// Set of selected categories. Empty means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryFilter {
    selected: BTreeSet<CategoryId>,
}

impl CategoryFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_all(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, id: CategoryId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.selected.iter().copied()
    }

    /// Add the category if absent, remove it if present.
    pub fn toggle(&mut self, id: CategoryId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn matches(&self, product: &Product) -> bool {
        if self.is_all() {
            return true;
        }
        product
            .category
            .as_ref()
            .is_some_and(|c| self.selected.contains(&c.id))
    }

    /// Parse a comma-separated id list (`"1,4,7"`); blank input is "All".
    pub fn parse_list(raw: &str) -> Result<Self, DomainError> {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse::<CategoryId>)
            .collect()
    }
}

impl FromIterator<CategoryId> for CategoryFilter {
    fn from_iter<I: IntoIterator<Item = CategoryId>>(iter: I) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}

/// Sort options offered on the listing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Upstream order.
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "price-low")]
    PriceLowToHigh,
    #[serde(rename = "price-high")]
    PriceHighToLow,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::None => "none",
            SortOrder::PriceLowToHigh => "price-low",
            SortOrder::PriceHighToLow => "price-high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::None => "Sort By",
            SortOrder::PriceLowToHigh => "Price: Low to High",
            SortOrder::PriceHighToLow => "Price: High to Low",
        }
    }

    /// Stable sort; products whose price does not parse go last either way.
    pub fn sort(&self, products: &mut [Product]) {
        match self {
            SortOrder::None => {}
            SortOrder::PriceLowToHigh => {
                products.sort_by(|a, b| compare_prices(a, b, false));
            }
            SortOrder::PriceHighToLow => {
                products.sort_by(|a, b| compare_prices(a, b, true));
            }
        }
    }
}

impl core::str::FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(SortOrder::None),
            "price-low" => Ok(SortOrder::PriceLowToHigh),
            "price-high" => Ok(SortOrder::PriceHighToLow),
            other => Err(DomainError::validation(format!(
                "unknown sort order {other:?} (expected none, price-low or price-high)"
            ))),
        }
    }
}

fn compare_prices(a: &Product, b: &Product, descending: bool) -> Ordering {
    match (sort_key(a), sort_key(b)) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter by category, then sort. The input order is the tie-breaker.
pub fn apply(products: &[Product], filter: &CategoryFilter, sort: SortOrder) -> Vec<Product> {
    let mut visible: Vec<Product> = products
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect();
    sort.sort(&mut visible);
    visible
}

/// Numeric price used for ordering, if the product has one.
pub fn sort_key(product: &Product) -> Option<Price> {
    product.price_value().ok()
}
