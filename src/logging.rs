//! Logging Setup
//!
//! The terminal UI owns stdout, so logs never go there. In debug mode logs are
//! written to a daily-rotated file; otherwise only warnings reach stderr.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_PREFIX: &str = "placement-hub.log";
const LOG_DIR_ENV: &str = "DEBUG_LOGS_LOCATION";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub debug_mode: bool,
    pub log_dir: PathBuf,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            debug_mode: false,
            log_dir: default_log_dir(),
            level: "info".to_string(),
        }
    }

    pub fn with_debug_mode(mut self, debug: bool) -> Self {
        self.debug_mode = debug;
        self
    }

    pub fn with_log_dir(mut self, dir: PathBuf) -> Self {
        self.log_dir = dir;
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    fn filter(&self) -> EnvFilter {
        let fallback = if self.debug_mode {
            format!("placement_hub={},warn", self.level)
        } else {
            "warn".to_string()
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }
}

/// Default log directory: `<data dir>/placement-hub/logs`
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("placement-hub")
        .join("logs")
}

/// Install the global subscriber. The returned guard must be held until exit
/// so buffered file output is flushed.
pub fn init_logging(config: LogConfig) -> Result<Option<WorkerGuard>> {
    if config.debug_mode {
        std::fs::create_dir_all(&config.log_dir)
            .with_context(|| format!("Failed to create log directory: {:?}", config.log_dir))?;

        let appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        tracing_subscriber::registry()
            .with(config.filter())
            .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
            .try_init()
            .context("Failed to install tracing subscriber")?;

        tracing::info!("Debug logging to {:?}", config.log_dir);
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(config.filter())
            .with(fmt::layer().with_writer(std::io::stderr).compact())
            .try_init()
            .context("Failed to install tracing subscriber")?;
        Ok(None)
    }
}

/// Where logs go: `DEBUG_LOGS_LOCATION`, then `[logging] file`, then the default.
pub fn resolve_log_dir(configured: Option<&Path>) -> PathBuf {
    resolve_log_dir_with(configured, |key| std::env::var(key).ok())
}

fn resolve_log_dir_with<F>(configured: Option<&Path>, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup(LOG_DIR_ENV)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| configured.map(Path::to_path_buf))
        .unwrap_or_else(default_log_dir)
}

/// Remove log files older than `max_age_days` from `dir`.
pub fn cleanup_old_logs(dir: &Path, max_age_days: u64) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let max_age = Duration::from_secs(max_age_days.saturating_mul(24 * 60 * 60));
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read {:?}", dir))? {
        let entry = entry?;
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(LOG_FILE_PREFIX) {
            continue;
        }
        let modified = entry.metadata().and_then(|m| m.modified());
        if let Ok(modified) = modified
            && now.duration_since(modified).unwrap_or_default() > max_age
        {
            std::fs::remove_file(entry.path())?;
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new()
            .with_debug_mode(true)
            .with_level("debug")
            .with_log_dir(PathBuf::from("/tmp/ph-logs"));
        assert!(config.debug_mode);
        assert_eq!(config.level, "debug");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/ph-logs"));
    }

    #[test]
    fn test_cleanup_missing_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(cleanup_old_logs(&missing, 7).unwrap(), 0);
    }

    #[test]
    fn test_cleanup_keeps_fresh_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("placement-hub.log.2026-01-01"), "x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        assert_eq!(cleanup_old_logs(dir.path(), 7).unwrap(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_cleanup_removes_old_logs_in_custom_dir() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("placement-hub.log.2026-01-01");
        let fresh = dir.path().join("placement-hub.log.2026-10-18");
        std::fs::write(&old, "x").unwrap();
        std::fs::write(&fresh, "x").unwrap();
        std::fs::File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(10 * 24 * 60 * 60))
            .unwrap();

        assert_eq!(cleanup_old_logs(dir.path(), 7).unwrap(), 1);
        assert!(!old.exists());
        assert!(fresh.exists());
    }

    #[test]
    fn test_cleanup_huge_age_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("placement-hub.log.2026-10-18"), "x").unwrap();

        assert_eq!(cleanup_old_logs(dir.path(), 213_503_982_334_602).unwrap(), 0);
        assert_eq!(cleanup_old_logs(dir.path(), u64::MAX).unwrap(), 0);
    }

    #[test]
    fn test_resolve_log_dir_priority() {
        let configured = PathBuf::from("/srv/ph-logs");

        let dir = resolve_log_dir_with(Some(&configured), |_| Some("/tmp/env-logs".into()));
        assert_eq!(dir, PathBuf::from("/tmp/env-logs"));

        let dir = resolve_log_dir_with(Some(&configured), |_| None);
        assert_eq!(dir, configured);

        let dir = resolve_log_dir_with(None, |_| Some(String::new()));
        assert_eq!(dir, default_log_dir());
    }
}
