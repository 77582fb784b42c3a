use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{LoggingSettings, default_log_path};

/// Environment variable that overrides `logging.level`.
pub const LOG_ENV: &str = "LYRICDECK_LOG";

/// Filter directive to use: the environment override when set, else the
/// configured level.
pub fn filter_directive(configured: &str, env_override: Option<String>) -> String {
    env_override
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| configured.trim().to_string())
}

/// Install the global subscriber writing to the log file. Returns the file
/// path, or `None` when logging is disabled or the file cannot be opened.
pub fn init(settings: &LoggingSettings) -> Option<PathBuf> {
    if !settings.enabled {
        return None;
    }
    let path = settings.file.clone().or_else(default_log_path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    let directive = filter_directive(&settings.level, std::env::var(LOG_ENV).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_filter(filter),
        )
        .try_init()
        .ok()?;

    Some(path)
}
