use axum::{routing::get, Router};

pub mod categories;
pub mod products;
pub mod revalidate;
pub mod slugs;
pub mod system;

/// Router for the public catalog endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .route("/categories", get(categories::list_categories))
        .route("/slugs", get(slugs::list_slugs))
}
