//! Logging infrastructure.
//!
//! Structured `tracing` output to a log file (cleared on session start) and,
//! optionally, to stdout. The filter comes from `RUST_LOG` and defaults to
//! `info`; debug mode forces `debug`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{config_directory, DEFAULT_LOG_FILE_NAME};

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize the global subscriber.
///
/// Creates the log directory if needed, clears the previous log file and
/// installs a file layer plus, when `stdout` is set, a console layer.
///
/// # Errors
///
/// Returns an error if the log file cannot be prepared or a global
/// subscriber is already installed.
pub fn init_logging(log_file: &Path, stdout: bool, debug: bool) -> Result<LoggingGuard, io::Error> {
    let (dir, name) = split_log_path(log_file)?;
    fs::create_dir_all(&dir)?;
    fs::write(log_file, "")?;

    let file_appender = tracing_appender::rolling::never(&dir, &name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stdout_layer = stdout.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(build_filter(debug))
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Default log file (~/.routesim/routesim.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join(DEFAULT_LOG_FILE_NAME)
}

fn build_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn split_log_path(log_file: &Path) -> Result<(PathBuf, String), io::Error> {
    let name = log_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("log path has no file name: {}", log_file.display()),
            )
        })?;
    let dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_file() {
        assert!(default_log_file().ends_with(".routesim/routesim.log"));
    }

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("/var/log/routesim.log")).unwrap();
        assert_eq!(dir, PathBuf::from("/var/log"));
        assert_eq!(name, "routesim.log");

        let (dir, name) = split_log_path(Path::new("routesim.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "routesim.log");

        assert!(split_log_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_debug_filter() {
        assert_eq!(build_filter(true).to_string(), "debug");
    }

    #[test]
    fn test_init_creates_and_clears_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let log_file = temp_dir.path().join("logs").join("routesim.log");
        std::fs::create_dir_all(log_file.parent().unwrap()).unwrap();
        std::fs::write(&log_file, "stale").unwrap();

        // A second global subscriber in the same test binary is rejected,
        // but the file is prepared either way.
        let _guard = init_logging(&log_file, false, false);

        assert_eq!(std::fs::read_to_string(&log_file).unwrap(), "");
    }
}
