use anyhow::Context;

use storefront_api::app::{build_app, build_services};
use storefront_api::config::StorefrontConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let config = StorefrontConfig::from_env().context("failed to load storefront configuration")?;
    if config.revalidate_secret.is_none() {
        tracing::warn!("STOREFRONT_REVALIDATE_SECRET not set; POST /revalidate is disabled");
    }

    let app = build_app(build_services(&config), config.revalidate_secret.clone());

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    tracing::info!(
        catalog = %config.catalog.api_url,
        "listening on {}",
        listener.local_addr().context("listener has no local address")?
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
