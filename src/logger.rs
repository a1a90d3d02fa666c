//! File-backed tracing setup. The terminal belongs to the UI, so log
//! records go to an append-only file instead of stderr.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

lazy_static::lazy_static! {
    static ref LOG_PATH: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Installs the global subscriber writing to `path`.
///
/// `RUST_LOG` takes precedence over `level`. Only the first call installs
/// anything; the log path it chose is returned on every later call.
pub fn init(path: &Path, level: &str) -> std::io::Result<PathBuf> {
    let mut active = LOG_PATH.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(existing) = active.as_ref() {
        return Ok(existing.clone());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber installed elsewhere (tests, embedding) wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();

    *active = Some(path.to_path_buf());
    Ok(path.to_path_buf())
}

/// Where log records are going, if logging has been initialized.
pub fn log_path() -> Option<PathBuf> {
    LOG_PATH.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

/// Maps `-v` repetitions onto a level, starting from the configured one.
pub fn level_for_verbosity(configured: &str, verbose: u8) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_init_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let first = temp_dir.path().join("logs").join("first.log");
        let second = temp_dir.path().join("second.log");

        let chosen = init(&first, "debug").unwrap();
        let again = init(&second, "debug").unwrap();

        assert_eq!(chosen, again);
        tracing::info!("logger test record");
    }

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity("info", 0), "info");
        assert_eq!(level_for_verbosity("info", 1), "debug");
        assert_eq!(level_for_verbosity("warn", 3), "trace");
    }
}
