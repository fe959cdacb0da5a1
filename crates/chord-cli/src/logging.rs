//! Logging setup for chordctl.
//!
//! Diagnostics go to stderr so that command output on stdout stays clean.
//! Optionally a daily-rotated `chordctl.log` is written as well.
//!
//! Settings come from the `logging.*` configuration keys; the environment
//! variables `CHORD_LOG_DIR`, `CHORD_LOG_CONSOLE` and `CHORD_LOG_FILE` take
//! precedence. `RUST_LOG`, when set, replaces the level filter entirely.

use std::path::PathBuf;

use chord_console::Configuration;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

const LOG_FILE_NAME: &str = "chordctl.log";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory for `chordctl.log` (default: `~/.chordctl/logs`)
    pub log_dir: PathBuf,
    pub console_output: bool,
    pub file_logging: bool,
    pub level: Level,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            console_output: true,
            file_logging: false,
            level: Level::INFO,
        }
    }
}

impl LoggingConfig {
    /// Create from application configuration, then apply `CHORD_LOG_*` overrides
    pub fn from_configuration(configuration: &Configuration) -> Self {
        let config = Self::from_config(
            configuration.log_dir(),
            configuration.log_console(),
            configuration.log_file(),
            configuration.log_level(),
        );
        config.with_env_overrides(|name| std::env::var(name).ok())
    }

    pub fn from_config(
        log_dir: Option<String>,
        console_output: bool,
        file_logging: bool,
        level: String,
    ) -> Self {
        Self {
            log_dir: log_dir.map(PathBuf::from).unwrap_or_else(default_log_dir),
            console_output,
            file_logging,
            level: level.parse().unwrap_or(Level::INFO),
        }
    }

    fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup("CHORD_LOG_DIR").filter(|v| !v.is_empty()) {
            self.log_dir = PathBuf::from(dir);
        }
        if let Some(console) = lookup("CHORD_LOG_CONSOLE").as_deref().and_then(parse_flag) {
            self.console_output = console;
        }
        if let Some(file) = lookup("CHORD_LOG_FILE").as_deref().and_then(parse_flag) {
            self.file_logging = file;
        }
        self
    }
}

fn default_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(format!("{}/.chordctl/logs", home))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Keeps the file appender worker alive; buffered output is flushed on drop
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

fn level_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Install the global subscriber. The returned guard must outlive the shell.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    let mut file_guard = None;

    if config.console_output {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(level_filter(config.level));
        layers.push(Box::new(console_layer));
    }

    if config.file_logging {
        std::fs::create_dir_all(&config.log_dir)?;
        let appender = RollingFileAppender::new(Rotation::DAILY, &config.log_dir, LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        file_guard = Some(guard);

        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_thread_names(true)
            .with_ansi(false)
            .with_filter(level_filter(config.level));
        layers.push(Box::new(file_layer));
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if config.file_logging {
        tracing::info!(log_dir = %config.log_dir.display(), "File logging initialized");
    }

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_config() {
        let config = LoggingConfig::from_config(
            Some("/var/log/chord".to_string()),
            false,
            true,
            "debug".to_string(),
        );
        assert_eq!(config.log_dir, PathBuf::from("/var/log/chord"));
        assert!(!config.console_output);
        assert!(config.file_logging);
        assert_eq!(config.level, Level::DEBUG);
    }

    #[test]
    fn test_invalid_level_falls_back_to_info() {
        let config = LoggingConfig::from_config(None, true, false, "loud".to_string());
        assert_eq!(config.level, Level::INFO);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CHORD_LOG_DIR", "/tmp/chord-logs"),
            ("CHORD_LOG_CONSOLE", "0"),
            ("CHORD_LOG_FILE", "TRUE"),
        ]);
        let config = LoggingConfig::default()
            .with_env_overrides(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/chord-logs"));
        assert!(!config.console_output);
        assert!(config.file_logging);
    }

    #[test]
    fn test_unparseable_flag_keeps_setting() {
        let config = LoggingConfig::default().with_env_overrides(|name| {
            (name == "CHORD_LOG_CONSOLE").then(|| "maybe".to_string())
        });
        assert!(config.console_output);
    }

    #[test]
    fn test_default_log_dir() {
        let config = LoggingConfig::from_config(None, true, false, "info".to_string());
        assert!(config.log_dir.ends_with(".chordctl/logs"));
    }
}
