use std::{
    fs,
    path::Path,
    sync::{Mutex, Once},
};

use tracing_subscriber::{EnvFilter, fmt};

static TRACING_INIT: Once = Once::new();

pub const ENV_LOG: &str = "SPENDR_LOG";
const DEFAULT_DIRECTIVE: &str = "spendr=info";

/// Initializes the global tracing subscriber, writing to `log_path`.
///
/// The TUI owns stdout, so logs never go to the terminal. `SPENDR_LOG` takes
/// precedence over the configured filter. If the log file cannot be opened,
/// logging stays disabled.
pub fn init(log_path: &Path, configured_filter: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(ENV_LOG)
            .or_else(|_| EnvFilter::try_new(configured_filter.unwrap_or(DEFAULT_DIRECTIVE)))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent).ok();
        }
        let file = match fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
        {
            Ok(file) => file,
            Err(_) => return,
        };

        fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
        tracing::info!(path = %log_path.display(), "Spendr tracing initialized.");
    });
}
