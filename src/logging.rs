use tracing::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::ServiceConfig;

pub const LOG_FILE_PREFIX: &str = "imv-prompts.log";

/// `RUST_LOG` wins over the configured filter.
pub fn build_filter(config: &ServiceConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
}

/// Console output plus, with `log_dir` set, a daily rolling file. The guard
/// flushes the file writer when dropped.
pub fn build_dispatch(config: &ServiceConfig) -> (Dispatch, Option<WorkerGuard>) {
    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt::layer())
        .with(file_layer);
    (Dispatch::new(subscriber), guard)
}

/// Install the global subscriber. Keep the returned guard alive until
/// shutdown so buffered file lines get written.
pub fn init_logging(config: &ServiceConfig) -> Option<WorkerGuard> {
    let (dispatch, guard) = build_dispatch(config);
    if let Err(e) = tracing::dispatcher::set_global_default(dispatch) {
        eprintln!("Logging already initialised: {}", e);
    }
    guard
}
