use anyhow::Context;
use clap::{Parser, Subcommand};

use boek_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "boek", about = "Boek console operations CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the console HTTP server
    Serve,
    /// Load and print the effective configuration, then exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    boek_telemetry::init();

    let cli = Cli::parse();
    let settings = Settings::load().with_context(|| "failed to load console settings")?;

    match cli.command {
        Command::Serve => boek_admin::run(settings).await,
        Command::CheckConfig => {
            tracing::info!(
                env = ?settings.environment,
                host = %settings.server.host,
                port = settings.server.port,
                catalog = %settings.catalog.base_url,
                role_header = %settings.auth.role_header,
                "configuration loaded"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_cmd::Command;

    #[test]
    fn help_lists_the_subcommands() {
        let output = Command::cargo_bin("boek-cli")
            .unwrap()
            .arg("--help")
            .assert()
            .success();
        let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
        assert!(stdout.contains("serve"));
        assert!(stdout.contains("check-config"));
    }
}
