use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_SUFFIX: &str = "log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Console-only tracing. A second call is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

/// Name of the log file for a run started now, e.g.
/// `backupLog-2026-10-16T14-03-27.log`.
pub fn log_file_name(prefix: &str, started: chrono::DateTime<chrono::Local>) -> String {
    format!(
        "{}-{}.{}",
        prefix,
        started.format("%Y-%m-%dT%H-%M-%S"),
        LOG_FILE_SUFFIX
    )
}

/// Console tracing plus a plain-text copy of every event in a fresh log file
/// under `dir`. Returns the log file's path.
pub fn init_tracing_with_log_file(dir: &Path, prefix: &str) -> Result<PathBuf> {
    let path = dir.join(log_file_name(prefix, chrono::Local::now()));
    let file = File::create(&path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_file_name() {
        let started = chrono::Local.with_ymd_and_hms(2026, 10, 16, 9, 5, 0).unwrap();
        assert_eq!(
            log_file_name("backupLog", started),
            "backupLog-2026-10-16T09-05-00.log"
        );
    }

    #[test]
    fn test_log_file_is_created_in_target() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = init_tracing_with_log_file(dir.path(), "backupLog").unwrap();
        assert!(path.starts_with(dir.path()));
        assert!(path.exists());
    }
}
