//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the catalog client and display settings shared by routes
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and view mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{build_services, AppServices};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// `POST /revalidate` is only mounted when a secret is given.
pub fn build_app(services: AppServices, revalidate_secret: Option<String>) -> Router {
    let services = Arc::new(services);

    let mut app = Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router());

    if let Some(secret) = revalidate_secret {
        let auth = middleware::RevalidateAuth {
            secret: Arc::from(secret),
        };
        let revalidate = Router::new()
            .route("/revalidate", post(routes::revalidate::revalidate))
            .route_layer(axum::middleware::from_fn_with_state(auth, middleware::revalidate_auth));
        app = app.merge(revalidate);
    }

    app.layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::request_id_middleware))
            .layer(Extension(services)),
    )
}
