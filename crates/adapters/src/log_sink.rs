//! Log sinks: where formatted lines end up.

use crate::error::LoggerBuildError;
use clog_config::LogTarget;
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// A sink that receives pre-formatted log lines.
pub trait LogSink: Send + Sync {
    /// Write a line to the sink.
    fn write_line(&self, line: &str);

    /// Drain buffered output. Best effort.
    fn flush(&self) {}
}

/// Log sink that writes to stderr.
#[derive(Debug, Default)]
pub struct StderrLogSink;

impl LogSink for StderrLogSink {
    fn write_line(&self, line: &str) {
        let mut stderr = std::io::stderr().lock();
        if let Err(error) = stderr.write_all(line.as_bytes()) {
            eprintln!("log sink write failed: {error}");
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Log sink that writes to stdout.
#[derive(Debug, Default)]
pub struct StdoutLogSink;

impl LogSink for StdoutLogSink {
    fn write_line(&self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(error) = stdout.write_all(line.as_bytes()) {
            eprintln!("log sink write failed: {error}");
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

/// Log sink appending to a file.
///
/// Line-buffered; lines from concurrent writers never interleave.
#[derive(Debug)]
pub struct FileLogSink {
    path: PathBuf,
    writer: Mutex<LineWriter<File>>,
}

impl FileLogSink {
    /// Open (or create) `path` for appending.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LoggerBuildError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LoggerBuildError::OpenFile {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            writer: Mutex::new(LineWriter::new(file)),
        })
    }

    /// Path this sink appends to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileLogSink {
    fn write_line(&self, line: &str) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = writer.write_all(line.as_bytes()) {
            eprintln!("log sink write failed ({}): {error}", self.path.display());
        }
    }

    fn flush(&self) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = writer.flush() {
            eprintln!("log sink flush failed ({}): {error}", self.path.display());
        }
    }
}

/// Open the sink for a resolved output target.
pub fn sink_for_target(target: &LogTarget) -> Result<Arc<dyn LogSink>, LoggerBuildError> {
    let sink: Arc<dyn LogSink> = match target {
        LogTarget::Stdout => Arc::new(StdoutLogSink),
        LogTarget::Stderr => Arc::new(StderrLogSink),
        LogTarget::File(path) => Arc::new(FileLogSink::open(path.clone())?),
    };
    Ok(sink)
}
