//! Tracing setup
//!
//! Installs a global `tracing` subscriber from [`LoggingConfig`]. Logs go to
//! stderr, or through a non-blocking appender when `logging.file` is set.
//! `GRANULE_SEARCH_LOG` overrides the configured level/filter.

use std::env;
use std::io;
use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Env var that overrides `logging.level`
pub const LOG_ENV: &str = "GRANULE_SEARCH_LOG";

static TRACE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Install the global subscriber. Later calls are no-ops.
pub fn init_tracing(config: &LoggingConfig) {
    let level = env::var(LOG_ENV).unwrap_or_else(|_| config.level.clone());
    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));
    let json = config.format == "json";

    let writer = match &config.file {
        Some(path) => match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
        {
            Ok(file) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                let _ = TRACE_GUARD.set(guard);
                tracing_subscriber::fmt::writer::BoxMakeWriter::new(non_blocking)
            }
            Err(e) => {
                eprintln!("ERROR: Unable to open log file '{path}': {e}");
                tracing_subscriber::fmt::writer::BoxMakeWriter::new(io::stderr)
            }
        },
        None => tracing_subscriber::fmt::writer::BoxMakeWriter::new(io::stderr),
    };

    let base = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer);

    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if json {
        Box::new(base.json().finish())
    } else {
        Box::new(base.compact().finish())
    };

    let _ = tracing::subscriber::set_global_default(subscriber);
}
