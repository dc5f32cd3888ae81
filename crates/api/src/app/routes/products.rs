use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use storefront_catalog::{listing, CategoryFilter, SortOrder};
use storefront_core::ImageId;

use crate::app::dto::{self, CategoryOption, ListingResponse, ProductCard, ProductDetail};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/:slug", get(get_product))
}

/// Listing page: products and categories are fetched concurrently, then
/// filtered and sorted.
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListingQuery>,
) -> axum::response::Response {
    let filter = match query.category.as_deref() {
        Some(raw) => match CategoryFilter::parse_list(raw) {
            Ok(f) => f,
            Err(e) => return errors::invalid_query(e),
        },
        None => CategoryFilter::all(),
    };
    let sort = match query.sort.as_deref().map(str::parse::<SortOrder>) {
        Some(Ok(s)) => s,
        Some(Err(e)) => return errors::invalid_query(e),
        None => SortOrder::None,
    };

    let (products, categories) = tokio::join!(
        services.catalog.list_products(),
        services.catalog.list_categories()
    );

    let resolver = services.catalog.resolver();
    let visible = listing::apply(&products, &filter, sort);

    Json(ListingResponse {
        products: visible
            .iter()
            .map(|p| ProductCard::from_product(p, resolver, &services.currency))
            .collect(),
        categories: categories
            .iter()
            .map(|c| CategoryOption::from_category(c, &filter))
            .collect(),
        selected: filter.selected().collect(),
        sort,
        sort_label: sort.label(),
    })
    .into_response()
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(slug): Path<String>,
    Query(query): Query<dto::DetailQuery>,
) -> axum::response::Response {
    let selected_image = match query.image.as_deref().map(str::parse::<ImageId>) {
        Some(Ok(id)) => Some(id),
        Some(Err(e)) => return errors::invalid_query(e),
        None => None,
    };

    let Some(product) = services.catalog.get_product_by_slug(&slug).await else {
        return errors::not_found(format!("no product with slug {slug:?}"));
    };

    Json(ProductDetail::from_product(
        &product,
        selected_image,
        services.catalog.resolver(),
        &services.currency,
        services.magnifier,
    ))
    .into_response()
}
