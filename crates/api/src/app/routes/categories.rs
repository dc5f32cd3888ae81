use std::sync::Arc;

use axum::{extract::Extension, Json};

use crate::app::dto::CategoriesResponse;
use crate::app::services::AppServices;

pub async fn list_categories(Extension(services): Extension<Arc<AppServices>>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: services.catalog.list_categories().await,
    })
}
