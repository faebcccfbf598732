//! Logging setup for the command-line driver.

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,plague_cli=debug,plague_world=debug";

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default filter; `PLAGUE_LOG_FORMAT=json` switches
/// to structured JSON lines. Logs go to stderr so stdout stays free for
/// frames and the summary table.
pub fn init_telemetry() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let json = std::env::var("PLAGUE_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;

    info!(json, "Telemetry initialized");
    Ok(())
}
