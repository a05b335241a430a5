use crate::Result;
use anyhow::anyhow;
use std::path::Path;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling,
};
use tracing_subscriber::{
    EnvFilter,
    fmt,
};

const DEFAULT_LOG_FILTER: &str = "info";
const LOG_FILE_PREFIX: &str = "dice-server.log";

/// Installs the global subscriber. `RUST_LOG` overrides the default `info`
/// filter. Keep the returned guard alive or buffered file logs are lost.
pub fn init_tracing(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    match log_dir {
        Some(dir) => {
            let (writer, guard) =
                tracing_appender::non_blocking(rolling::daily(dir, LOG_FILE_PREFIX));
            fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;
            Ok(Some(guard))
        }
        None => {
            fmt()
                .with_env_filter(filter)
                .try_init()
                .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;
            Ok(None)
        }
    }
}
