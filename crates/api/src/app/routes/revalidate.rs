use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::app::dto::{RevalidateRequest, RevalidateResponse};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::RequestContext;

/// Purge cached catalog responses by tag (`products`, `categories`,
/// `product-slugs`, `product-<slug>`), e.g. from a CMS publish webhook.
pub async fn revalidate(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<RevalidateRequest>,
) -> axum::response::Response {
    let tag = body.tag.trim();
    if tag.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "tag must not be empty");
    }

    let purged = services.catalog.invalidate_tag(tag);
    tracing::info!(request_id = %ctx.request_id(), tag, purged, "revalidated");

    Json(RevalidateResponse {
        tag: tag.to_string(),
        purged,
    })
    .into_response()
}
