//! Shared append-only run log.
//!
//! Every worker records its file's outcome here. Each call writes one whole
//! line under a lock, so lines from concurrent workers never interleave.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{SecondsFormat, Utc};

use crate::{FileOutcome, Severity, WorstOutcome};

type LogWriter = Box<dyn Write + Send>;

/// Run log shared by all workers of a batch.
///
/// Lines have the form `<UTC timestamp> [<code>] <message>`; notes without a
/// return code omit the bracketed field.
pub struct RunLog {
    writer: Mutex<LogWriter>,
    worst: WorstOutcome,
}

impl RunLog {
    /// Creates a log writing to `writer`.
    #[must_use]
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            worst: WorstOutcome::new(),
        }
    }

    /// Opens `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }

    /// Records the outcome of the file at `path`.
    ///
    /// Updates the worst outcome, appends a log line and mirrors the line to
    /// `tracing`.
    pub fn record(&self, path: &Path, outcome: &FileOutcome) {
        self.worst.record(outcome.severity());

        let code = outcome.code();
        let message = outcome.message(path);
        match outcome.severity() {
            Severity::Success => tracing::info!(code, "{message}"),
            Severity::Ignored => tracing::debug!(code, "{message}"),
            Severity::Failure => tracing::warn!(code, "{message}"),
        }

        self.write_line(&format!("[{code}] {message}"));
    }

    /// Appends a free-form note.
    pub fn note(&self, message: &str) {
        tracing::info!("{message}");
        self.write_line(message);
    }

    /// Returns the worst severity recorded so far.
    #[must_use]
    pub fn worst(&self) -> Severity {
        self.worst.get()
    }

    /// Returns the worst-outcome tracker.
    #[must_use]
    pub const fn worst_outcome(&self) -> &WorstOutcome {
        &self.worst
    }

    fn write_line(&self, line: &str) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut writer = self.lock();
        let result = writeln!(writer, "{timestamp} {line}").and_then(|()| writer.flush());
        if let Err(e) = result {
            tracing::error!(error = %e, "failed to write run log");
        }
    }

    fn lock(&self) -> MutexGuard<'_, LogWriter> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RunLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLog")
            .field("worst", &self.worst)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConversionStats, Stage, StageError};
    use scidpack_types::ScidpackError;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn succeeded() -> FileOutcome {
        FileOutcome::Succeeded {
            artifact: PathBuf::from("/out/ESZ20.zip"),
            stats: ConversionStats {
                records_read: 3,
                rows_written: 1,
                ..ConversionStats::default()
            },
        }
    }

    #[test]
    fn test_record_line_format() {
        let buffer = SharedBuffer::default();
        let log = RunLog::new(buffer.clone());

        log.record(Path::new("/data/ESZ20.scid"), &succeeded());

        let contents = buffer.contents();
        let (timestamp, rest) = contents.trim_end().split_once(' ').unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
        assert_eq!(
            rest,
            "[0] Converted /data/ESZ20.scid to /out/ESZ20.zip (1 of 3 records kept)"
        );
        assert_eq!(log.worst(), Severity::Success);
    }

    #[test]
    fn test_record_tracks_worst() {
        let log = RunLog::new(io::sink());
        let failed = FileOutcome::Failed(StageError::new(
            Stage::StreamingRecords,
            ScidpackError::IoErrorReadingData("truncated".to_string()),
        ));

        log.record(Path::new("ESH21.scid"), &failed);
        log.record(Path::new("ESZ20.scid"), &succeeded());

        assert_eq!(log.worst(), Severity::Failure);
        assert!(log.worst_outcome().any_failed());
    }

    #[test]
    fn test_concurrent_lines_do_not_interleave() {
        let buffer = SharedBuffer::default();
        let log = Arc::new(RunLog::new(buffer.clone()));

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let log = Arc::clone(&log);
                scope.spawn(move || {
                    for i in 0..50 {
                        log.note(&format!("worker {worker} line {i} end"));
                    }
                });
            }
        });

        let contents = buffer.contents();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 400);
        for line in lines {
            assert!(line.ends_with(" end"), "interleaved line: {line}");
            assert_eq!(line.matches("worker").count(), 1);
        }
    }

    #[test]
    fn test_create_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scidpack.log");

        RunLog::create(&path).unwrap().note("first run");
        RunLog::create(&path).unwrap().note("second run");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first run"));
        assert!(lines[1].ends_with("second run"));
    }
}
