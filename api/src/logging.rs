//! Tracing subscriber setup
//!
//! `log` records emitted by actix-web's `Logger` are bridged into the same
//! subscriber, so request lines and service events share one output format.

use std::io;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use inno_shared::config::{Environment, LogFormat, LoggingConfig};

/// Install the global subscriber described by `config`
///
/// # Errors
///
/// Fails when the filter directive does not parse or a global subscriber
/// is already installed.
pub fn init(config: &LoggingConfig, environment: Environment) -> Result<()> {
    let env_filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("invalid log filter '{}'", config.level))?
        .add_directive(
            "actix_server=info"
                .parse()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        );

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match config.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_target(true)
                .with_writer(io::stdout)
                .json();
            registry.with(layer).try_init()
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_target(true)
                .with_writer(io::stdout);
            registry.with(layer).try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stdout);
            registry.with(layer).try_init()
        }
    };
    installed.context("failed to install tracing subscriber")?;

    info!(
        service.version = env!("CARGO_PKG_VERSION"),
        environment = %environment,
        log.level = %config.level,
        log.format = ?config.format,
        "Logging initialized"
    );

    Ok(())
}
