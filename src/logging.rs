//! Tracing configuration and log routing.
//!
//! Console logs use a compact formatter. The HTTP server writes them to stdout; the command-line
//! driver writes them to stderr so that stdout carries only the rendered report. A second,
//! non-blocking file layer is added unless disabled: `PAPERSYNTH_LOG_FILE` names the file to
//! append to, the value `off` disables it, and the default is `logs/papersynth.log`.
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_ENV: &str = "PAPERSYNTH_LOG_FILE";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_FILE: &str = "papersynth.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Console stream receiving human-readable logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    /// Standard output (server mode).
    Stdout,
    /// Standard error (CLI mode, keeps stdout clean).
    Stderr,
}

/// Where the file layer should write, as resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FileTarget {
    Disabled,
    Explicit(PathBuf),
    Default,
}

/// Configure tracing subscribers for console and file logging.
///
/// - Respects `RUST_LOG` for filtering (defaults to `info`).
/// - Sends console output to the requested stream.
/// - Keeps the non-blocking file writer alive for the process lifetime through a global guard.
pub fn init_tracing(console: ConsoleTarget) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = match console {
        ConsoleTarget::Stdout => fmt::layer().with_target(false).compact().boxed(),
        ConsoleTarget::Stderr => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .boxed(),
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let file_target = resolve_file_target(std::env::var(LOG_FILE_ENV).ok().as_deref());
    if let Some(writer) = configure_file_writer(file_target) {
        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .compact();

        registry.with(file_layer).init();
    } else {
        registry.init();
    }
}

fn resolve_file_target(value: Option<&str>) -> FileTarget {
    match value.map(str::trim) {
        None | Some("") => FileTarget::Default,
        Some(value) if value.eq_ignore_ascii_case("off") => FileTarget::Disabled,
        Some(path) => FileTarget::Explicit(PathBuf::from(path)),
    }
}

/// Build a non-blocking writer for file logging.
///
/// Returns `None` when file logging is disabled or the target cannot be opened.
fn configure_file_writer(target: FileTarget) -> Option<NonBlocking> {
    match target {
        FileTarget::Disabled => None,
        FileTarget::Explicit(path) => open_append(&path),
        FileTarget::Default => {
            if let Err(err) = std::fs::create_dir_all(DEFAULT_LOG_DIR) {
                eprintln!("Failed to create logs directory: {err}");
                return None;
            }
            let file_appender = tracing_appender::rolling::never(DEFAULT_LOG_DIR, DEFAULT_LOG_FILE);
            Some(install_writer(file_appender))
        }
    }
}

fn open_append(path: &Path) -> Option<NonBlocking> {
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    {
        Ok(file) => Some(install_writer(file)),
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", path.display());
            None
        }
    }
}

fn install_writer<W: std::io::Write + Send + 'static>(writer: W) -> NonBlocking {
    let (non_blocking, guard) = tracing_appender::non_blocking(writer);
    let _ = LOG_GUARD.set(guard);
    non_blocking
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_target_defaults_when_unset_or_blank() {
        assert_eq!(resolve_file_target(None), FileTarget::Default);
        assert_eq!(resolve_file_target(Some("  ")), FileTarget::Default);
    }

    #[test]
    fn file_target_can_be_disabled() {
        assert_eq!(resolve_file_target(Some("OFF")), FileTarget::Disabled);
        assert!(configure_file_writer(FileTarget::Disabled).is_none());
    }

    #[test]
    fn file_target_accepts_explicit_path() {
        assert_eq!(
            resolve_file_target(Some(" /tmp/papersynth.log ")),
            FileTarget::Explicit(PathBuf::from("/tmp/papersynth.log"))
        );
    }
}
