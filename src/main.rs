use anyhow::Context;
use boek_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    boek_telemetry::init();

    let settings = Settings::load().with_context(|| "failed to load console settings")?;

    tracing::info!(
        env = ?settings.environment,
        catalog = %settings.catalog.base_url,
        "boek console starting"
    );

    boek_admin::run(settings).await
}
