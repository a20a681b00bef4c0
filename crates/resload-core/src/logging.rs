//! Tracing setup for the CLI.
//!
//! Events go to `$XDG_STATE_HOME/resload/resload.log` when that file can be
//! opened; otherwise the caller falls back to [`init_logging_stderr`].
//! `RUST_LOG` overrides the built-in filter in both cases. The loader's
//! diagnostic trace uses target `resload::loader` at debug level, so the
//! default filter lets it through once `debug_trace` is on.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,resload=debug,resload_core=debug";

/// Where [`init_logging`] writes.
pub fn log_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("resload")?;
    Ok(dirs.get_state_home().join("resload.log"))
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Per-event handle on the log file; stderr if the handle cannot be cloned.
enum LogSink {
    File(File),
    Stderr,
}

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::File(f) => f.write(buf),
            LogSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::File(f) => f.flush(),
            LogSink::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct LogFile(File);

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogSink;

    fn make_writer(&'a self) -> LogSink {
        self.0.try_clone().map(LogSink::File).unwrap_or(LogSink::Stderr)
    }
}

fn open_log(path: &std::path::Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))
}

/// Install the global subscriber writing to [`log_path`].
/// Returns Err without installing anything if the file cannot be opened.
pub fn init_logging() -> Result<()> {
    let path = log_path()?;
    let file = open_log(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(BoxMakeWriter::new(LogFile(file)))
        .with_ansi(false)
        .init();

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}

/// Install the global subscriber writing to stderr.
pub fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn log_path_is_under_resload_state_dir() {
        let path = log_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "resload.log");
        assert!(path.parent().unwrap().ends_with("resload"));
    }

    #[test]
    fn open_log_creates_parent_dirs_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("resload.log");
        open_log(&path).unwrap().write_all(b"one\n").unwrap();
        let mut sink = LogFile(open_log(&path).unwrap()).make_writer();
        sink.write_all(b"two\n").unwrap();
        sink.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }
}
