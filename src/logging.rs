use crate::config::LoggingConfig;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes logging: human-readable lines on stderr, plus daily-rotated
/// JSON files when a log directory is configured. Stdout is left to the
/// extracted tables.
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the life of the process.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let _ = fs::create_dir_all(directory);
            let file_appender = tracing_appender::rolling::daily(directory, "review_tally.log");
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
            (Some(fmt::layer().json().with_writer(non_blocking_writer)), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // RUST_LOG wins over the configured filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    guard
}
