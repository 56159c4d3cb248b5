//! Tracing subscriber setup for hosts embedding the forum core.
//!
//! The library only emits events; a host calls [`init`] once at startup.
//! `RUST_LOG` directives take precedence over the configured level.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{ForumError, Result};

/// Parse a configured level; unknown values fall back to `info`.
fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(parse_level(level).into())
        .from_env_lossy()
}

/// Install a global subscriber writing to stdout and appending to the
/// configured log file.
///
/// Fails with [`ForumError::Config`] if a global subscriber is already set.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let path = Path::new(&config.file);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let log_file = Arc::new(OpenOptions::new().create(true).append(true).open(path)?);
    let writer = std::io::stdout.and(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(build_filter(&config.level))
        .try_init()
        .map_err(|e| ForumError::Config(format!("logging already initialized: {e}")))
}

/// Install a console-only subscriber, for tools and local runs.
pub fn init_console_only(level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(build_filter(level))
        .try_init()
        .map_err(|e| ForumError::Config(format!("logging already initialized: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_parse_level_case_insensitive() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("Info"), Level::INFO);
        assert_eq!(parse_level("warning"), Level::WARN);
        assert_eq!(parse_level("verbose"), Level::INFO);
    }

    // The only test in this binary that installs a global subscriber.
    #[test]
    fn test_init_creates_log_file_and_refuses_second_subscriber() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("logs").join("forum.log");
        let config = LoggingConfig {
            level: "debug".to_string(),
            file: file.to_string_lossy().into_owned(),
        };

        let _ = init(&config);
        assert!(file.exists());

        let err = init(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(init_console_only("info").is_err());
    }
}
