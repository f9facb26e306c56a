use std::{
    fs::{self, OpenOptions},
    io,
    path::Path,
    sync::Mutex,
};

use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Installs the global tracing subscriber.
///
/// The level comes from `RUST_LOG`, falling back to `info`. Logs are
/// appended to `log_file` when given (the terminal UI owns the screen),
/// otherwise written to stderr.
pub fn init(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match log_file {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create log directory: {}", dir.display())
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(io::stderr).try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))
}
