//! File logging. The terminal belongs to the UI, so without a log file no
//! subscriber is installed and events are dropped.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "helios=info";

/// Install a `RUST_LOG`-filtered subscriber appending to `log_file`.
pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| io::Error::other(format!("failed to install log subscriber: {e}")))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}
