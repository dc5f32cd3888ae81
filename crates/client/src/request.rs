//! The four catalog requests: endpoint, query parameters, cache tag.

use chrono::Duration;
use reqwest::Url;

use crate::config::StalenessBudgets;

const PRODUCTS_PATH: [&str; 2] = ["api", "products"];
// The CMS collection really is spelled this way.
const CATEGORIES_PATH: [&str; 2] = ["api", "catagories"];

/// Images (url + renditions), category name and sizes embedded per product.
const PRODUCT_POPULATION: [(&str, &str); 4] = [
    ("populate[images][fields][0]", "url"),
    ("populate[images][fields][1]", "formats"),
    ("populate[catagory][fields][0]", "Name"),
    ("populate[size]", "true"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListProducts,
    ProductBySlug,
    ListCategories,
    ListProductSlugs,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ListProducts => "list_products",
            Operation::ProductBySlug => "get_product_by_slug",
            Operation::ListCategories => "list_categories",
            Operation::ListProductSlugs => "list_product_slugs",
        }
    }

    pub fn budget(&self, budgets: &StalenessBudgets) -> Duration {
        match self {
            Operation::ListProducts => budgets.products,
            Operation::ProductBySlug => budgets.product_by_slug,
            Operation::ListCategories => budgets.categories,
            Operation::ListProductSlugs => budgets.product_slugs,
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single outbound catalog read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    operation: Operation,
    path: [&'static str; 2],
    params: Vec<(&'static str, String)>,
    tag: String,
}

impl CatalogRequest {
    pub fn list_products() -> Self {
        Self {
            operation: Operation::ListProducts,
            path: PRODUCTS_PATH,
            params: population(),
            tag: "products".to_string(),
        }
    }

    pub fn product_by_slug(slug: &str) -> Self {
        let mut params = vec![("filters[slug][$eq]", slug.to_string())];
        params.extend(population());
        Self {
            operation: Operation::ProductBySlug,
            path: PRODUCTS_PATH,
            params,
            tag: format!("product-{slug}"),
        }
    }

    pub fn list_categories() -> Self {
        Self {
            operation: Operation::ListCategories,
            path: CATEGORIES_PATH,
            params: vec![("populate", "products".to_string())],
            tag: "categories".to_string(),
        }
    }

    pub fn list_product_slugs() -> Self {
        Self {
            operation: Operation::ListProductSlugs,
            path: PRODUCTS_PATH,
            params: vec![("fields[0]", "slug".to_string())],
            tag: "product-slugs".to_string(),
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Cache tag used for out-of-band purges.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Fully-qualified URL: any path prefix on `base` is kept, the query is
    /// replaced. This string is also the cache key.
    pub fn url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(self.path);
        }
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in &self.params {
                query.append_pair(key, value);
            }
        }
        url
    }
}

fn population() -> Vec<(&'static str, String)> {
    PRODUCT_POPULATION
        .iter()
        .map(|(k, v)| (*k, v.to_string()))
        .collect()
}
