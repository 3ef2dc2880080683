//! Log to a file in the data directory; the terminal belongs to the UI.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "GASYARD_LOG";

const LOG_FILE: &str = "gasyard.log";

fn log_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("xyz", "gasyard", "gasyard")?;
    let dir = dirs.data_dir();
    fs::create_dir_all(dir).ok()?;
    Some(dir.join(LOG_FILE))
}

/// Install the global subscriber. Logging stays off when the log file
/// cannot be created.
pub fn init() -> Option<PathBuf> {
    let path = log_path()?;
    let file = File::create(&path).ok()?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .ok()?;
    Some(path)
}
