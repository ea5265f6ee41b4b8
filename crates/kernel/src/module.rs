use async_trait::async_trait;
use axum::Router;

use crate::roles::RouteAccess;

/// Context provided to modules during initialization
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// Lifecycle trait every console feature module implements.
///
/// Modules own their state (repositories, wizard sessions) and expose it
/// through the router returned by [`Module::routes`]; the registry drives
/// init/start/stop around the HTTP server's lifetime.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module; routes mount under `/api/{name}`.
    fn name(&self) -> &'static str;

    /// Who may reach this module's routes.
    fn access(&self) -> RouteAccess {
        RouteAccess::Authenticated
    }

    /// Initialize the module with the provided context.
    /// Called during application startup, before the server binds.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the Axum router for this module's routes.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// Return an OpenAPI fragment for this module as JSON.
    /// Fragments are merged into the console-wide spec.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Start background work for this module, after all modules initialized.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and release resources during shutdown.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
