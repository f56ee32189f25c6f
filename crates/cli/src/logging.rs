//! Logging setup (tracing-subscriber)
//!
//! Logs go to stderr so stdout stays reserved for diagnostics and `--json` output.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "detach_core=info,detach_cli=info,detach_infra_system=info";

/// Initialize the global subscriber
///
/// # Environment Variables
///
/// - `RUST_LOG`: filter directives (default: info for detach crates)
/// - `DETACH_LOG_FORMAT`: `json` for structured output, anything else for pretty
pub fn init_logging(format: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")?;

    match format {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to install JSON subscriber")?;
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to install subscriber")?;
        }
    }

    Ok(())
}
