//! Console and file logging.
//!
//! The console shows whatever `RUST_LOG` (or the configured directive) lets
//! through. Every file under the log directory receives JSON lines from this
//! crate only, capped at the deployment mode's level: one file per severity
//! threshold, `alert.log` for alerts and errors, and `combined.log` for
//! everything that passes the cap.

use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, filter::Targets, fmt, layer::Filter, prelude::*,
};

use crate::config::{DeploymentMode, Logging};

/// Target used for events that an operator should look at even in production.
pub const ALERT_TARGET: &str = "alert";

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Threshold files, most severe first.
const LEVEL_FILES: &[(&str, LevelFilter)] = &[
    ("error.log", LevelFilter::ERROR),
    ("warn.log", LevelFilter::WARN),
    ("info.log", LevelFilter::INFO),
    ("debug.log", LevelFilter::DEBUG),
    ("trace.log", LevelFilter::TRACE),
];

/// The most verbose level written anywhere in the given mode.
fn mode_level(mode: DeploymentMode) -> LevelFilter {
    match mode {
        DeploymentMode::Development => LevelFilter::DEBUG,
        DeploymentMode::Production => LevelFilter::WARN,
    }
}

/// The console filter used when neither `RUST_LOG` nor the config set one.
pub fn default_directive(mode: DeploymentMode) -> &'static str {
    match mode {
        DeploymentMode::Development => concat!(env!("CARGO_CRATE_NAME"), "=debug,alert=trace"),
        DeploymentMode::Production => concat!(env!("CARGO_CRATE_NAME"), "=warn,alert=trace"),
    }
}

/// Events from this crate (alerts included) at `threshold` or more severe,
/// never more verbose than the mode allows.
fn file_filter(mode: DeploymentMode, threshold: LevelFilter) -> Targets {
    let level = threshold.min(mode_level(mode));
    Targets::new()
        .with_target(CRATE_TARGET, level)
        .with_target(ALERT_TARGET, level)
}

fn alert_filter() -> Targets {
    Targets::new()
        .with_target(ALERT_TARGET, LevelFilter::TRACE)
        .with_target(CRATE_TARGET, LevelFilter::ERROR)
}

fn console_filter(mode: DeploymentMode, config: &Logging) -> EnvFilter {
    let fallback = config
        .console_level
        .as_deref()
        .unwrap_or_else(|| default_directive(mode));
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

fn file_layer<F>(
    directory: &Path,
    file_name: &str,
    filter: F,
    guards: &mut Vec<WorkerGuard>,
) -> BoxedLayer
where
    F: Filter<Registry> + Send + Sync + 'static,
{
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    guards.push(guard);
    fmt::layer()
        .json()
        .with_writer(writer)
        .with_filter(filter)
        .boxed()
}

/// Installs the global subscriber. The returned guards flush the file writers
/// when dropped, so keep them alive for the lifetime of the process.
pub fn init(mode: DeploymentMode, config: &Logging) -> anyhow::Result<Vec<WorkerGuard>> {
    std::fs::create_dir_all(&config.directory)?;

    let mut guards = Vec::with_capacity(LEVEL_FILES.len() + 2);
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(LEVEL_FILES.len() + 3);

    layers.push(
        fmt::layer()
            .compact()
            .with_target(false)
            .with_filter(console_filter(mode, config))
            .boxed(),
    );

    for (file_name, threshold) in LEVEL_FILES {
        layers.push(file_layer(
            &config.directory,
            file_name,
            file_filter(mode, *threshold),
            &mut guards,
        ));
    }

    layers.push(file_layer(
        &config.directory,
        "alert.log",
        alert_filter(),
        &mut guards,
    ));
    layers.push(file_layer(
        &config.directory,
        "combined.log",
        file_filter(mode, LevelFilter::TRACE),
        &mut guards,
    ));

    tracing_subscriber::registry().with(layers).try_init()?;

    Ok(guards)
}
