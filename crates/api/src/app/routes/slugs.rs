use std::sync::Arc;

use axum::{extract::Extension, Json};

use crate::app::dto::SlugsResponse;
use crate::app::services::AppServices;

/// Every product slug, for pre-rendering detail pages.
pub async fn list_slugs(Extension(services): Extension<Arc<AppServices>>) -> Json<SlugsResponse> {
    Json(SlugsResponse {
        slugs: services.catalog.list_product_slugs().await,
    })
}
