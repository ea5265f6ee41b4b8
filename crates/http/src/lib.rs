//! HTTP server facade for the Boek console: Axum router assembly, the
//! shared error envelope, pagination types, and the role guard.

use anyhow::Context;
use axum::{routing::get, Router};

use boek_kernel::{settings::Settings, ModuleRegistry};

pub mod auth;
pub mod error;
pub mod pagination;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server with the given module registry
pub async fn start_server(registry: &ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    let app = build_router(registry, settings);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "console listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with all module routes mounted behind their
/// role guards.
pub fn build_router(registry: &ModuleRegistry, settings: &Settings) -> Router {
    let mut router_builder = RouterBuilder::new()
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .route("/healthz", get(health_check));

    for module in registry.modules() {
        tracing::info!(
            module = module.name(),
            access = ?module.access(),
            "mounting module routes under /api/{}",
            module.name()
        );
        router_builder = router_builder.mount_module(
            module.name(),
            module.routes(),
            module.access(),
            &settings.auth.role_header,
        );
    }

    router_builder.with_openapi(registry).build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "console is healthy"
}
