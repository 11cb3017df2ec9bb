use std::fs::OpenOptions;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global subscriber.
///
/// Console output goes to stderr so command output on stdout stays clean.
/// `QUOTES_LOG` sets the console filter (default `info`); `QUOTES_LOG_FILE`
/// adds a debug-level file layer.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("QUOTES_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    let registry = tracing_subscriber::registry().with(console);

    let file_logging = std::env::var("QUOTES_LOG_FILE").ok();
    if let Some(log_path) = file_logging {
        match OpenOptions::new().create(true).append(true).open(&log_path) {
            Ok(file) => {
                let file_layer = fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG);
                // try_init: tests and embedders may already own the global subscriber
                let _ = registry.with(file_layer).try_init();
                tracing::debug!("File logging enabled: {}", log_path);
            }
            Err(e) => {
                let _ = registry.try_init();
                tracing::warn!("Failed to open log file {}: {}", log_path, e);
            }
        }
    } else {
        let _ = registry.try_init();
    }
}
