use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use biblio_kernel::settings::Settings;

/// Library management API
#[derive(Debug, Parser)]
#[command(name = "biblio", version, about)]
struct Cli {
    /// Environment overlay to load (local, staging, production)
    #[arg(long, global = true, env = "BIBLIO_ENV", default_value = "local")]
    env: String,

    /// Directory holding base.toml and the environment overlays
    #[arg(long, global = true, env = "BIBLIO_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API until interrupted
    Serve {
        /// Override the configured bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,

        /// Start with empty collections instead of the sample catalogue
        #[arg(long)]
        empty: bool,
    },
    /// Print the effective settings as JSON and exit
    CheckConfig,
}

impl Cli {
    fn load_settings(&self) -> anyhow::Result<Settings> {
        let config_dir = match &self.config_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()
                .context("unable to resolve current directory")?
                .join("config"),
        };
        Settings::load_from(&config_dir, &self.env)
            .with_context(|| format!("failed to load settings from {}", config_dir.display()))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = cli.load_settings()?;

    match cli.command {
        Command::CheckConfig => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{}", rendered);
            Ok(())
        }
        Command::Serve { host, port, empty } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            if empty {
                settings.store.seed_sample_data = false;
            }

            biblio_telemetry::init(&settings.telemetry)?;
            tracing::info!(
                env = ?settings.environment,
                address = %settings.server.bind_address(),
                seeded = settings.store.seed_sample_data,
                "biblio CLI serving"
            );

            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime.block_on(biblio_app::run(settings))
        }
    }
}
