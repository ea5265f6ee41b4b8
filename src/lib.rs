//! Boek Console Application Library
//!
//! Feature modules and utilities for the Boek administrative console.

pub mod modules;
pub mod utils;

use boek_kernel::settings::Settings;
use boek_kernel::{InitCtx, ModuleRegistry};

/// Bring up the console: register modules, run their lifecycle, and serve
/// HTTP until the process is stopped.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &settings)?;

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    boek_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;
    Ok(())
}
