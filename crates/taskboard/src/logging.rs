use std::fs;

use chrono::{DateTime, Local};
use color_eyre::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::Config;

/// One file per run: `taskboard-20261016-143000.log`.
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!(
        "{}-{}.log",
        env!("CARGO_PKG_NAME"),
        started.format("%Y%m%d-%H%M%S")
    )
}

pub fn default_level() -> LevelFilter {
    #[cfg(debug_assertions)]
    let level = LevelFilter::INFO;

    #[cfg(not(debug_assertions))]
    let level = LevelFilter::WARN;

    level
}

/// `RUST_LOG` if set, otherwise the configured directives, on top of the build default.
pub fn env_filter(configured: Option<&str>) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(default_level().into());
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => builder.parse_lossy(directives),
        Err(_) => builder.parse_lossy(configured.unwrap_or_default()),
    }
}

/// Install file + console layers. The returned guard must live until exit so
/// buffered lines reach the log file.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    let log_dir = config.data_dir.join("logs");
    fs::create_dir_all(&log_dir)?;

    let file_appender =
        tracing_appender::rolling::never(&log_dir, log_file_name(Local::now()));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let configured = config.log_level.as_deref();
    let file_layer = fmt::Layer::default()
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_filter(env_filter(configured));

    // stdout carries command output
    let console_layer = fmt::Layer::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter(configured));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    Ok(guard)
}
