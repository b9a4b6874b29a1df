//! Tracing bootstrap for the library API.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use biblio_kernel::settings::{LogFormat, TelemetrySettings};

/// Build the log filter: `RUST_LOG` when set, the configured level otherwise.
pub fn env_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.log_level)
            .with_context(|| format!("invalid log level '{}'", settings.log_level)),
    }
}

/// Install the global tracing subscriber.
///
/// A subscriber installed earlier (tests, embedding binaries) is left in
/// place.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = env_filter(settings)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    match installed {
        Ok(()) => tracing::info!(
            target: "biblio-telemetry",
            format = ?settings.log_format,
            level = %settings.log_level,
            "telemetry initialized"
        ),
        Err(err) => tracing::debug!(
            target: "biblio-telemetry",
            error = %err,
            "tracing subscriber already installed"
        ),
    }

    Ok(())
}
