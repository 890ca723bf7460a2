//! Parallel batch conversion.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, Stream, StreamExt};
use scidpack_calendar::{HolidaySet, TimeConverter};
use scidpack_format::{ArchiveSink, RowSink};
use scidpack_types::{ContractName, ScidpackError};

use crate::{ConvertConfig, Converter, FileOutcome, RunLog, Severity, Stage, StageError};

/// Extension of Sierra Chart intraday files.
pub const SCID_EXTENSION: &str = "scid";

/// Counts of per-file outcomes for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files converted.
    pub succeeded: usize,
    /// Files skipped in update-only mode.
    pub ignored: usize,
    /// Files that failed.
    pub failed: usize,
    /// Worst outcome of the batch.
    pub worst: Severity,
    /// Wall-clock time of the batch.
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Returns the total number of files processed.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.succeeded + self.ignored + self.failed
    }

    /// Returns true if no file failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.worst < Severity::Failure
    }

    fn add(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Succeeded { .. } => self.succeeded += 1,
            FileOutcome::Ignored { .. } => self.ignored += 1,
            FileOutcome::Failed(_) => self.failed += 1,
        }
        self.worst = self.worst.max(outcome.severity());
    }
}

/// Lists the `.scid` files in `dir` whose names start with `symbol`.
///
/// Only regular files directly inside `dir` are considered. Matching of both
/// the symbol prefix and the extension ignores ASCII case. The result is
/// sorted by path.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn discover_inputs(dir: &Path, symbol: &str) -> io::Result<Vec<PathBuf>> {
    let prefix = symbol.to_ascii_uppercase();
    let mut paths = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let is_scid = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SCID_EXTENSION));
        let matches_symbol = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().to_ascii_uppercase().starts_with(&prefix));

        if is_scid && matches_symbol {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

/// Creates a stream converting `paths` on at most `jobs` blocking workers.
///
/// Each worker records its outcome in `log` before yielding it. Outcomes are
/// yielded in completion order. A worker that panics is reported as a
/// failure of its file.
pub fn outcome_stream<S: RowSink + 'static>(
    converter: Arc<Converter<S>>,
    log: Arc<RunLog>,
    paths: Vec<PathBuf>,
    jobs: usize,
) -> impl Stream<Item = (PathBuf, FileOutcome)> {
    stream::iter(paths)
        .map(move |path| {
            let converter = Arc::clone(&converter);
            let log = Arc::clone(&log);
            async move {
                let worker_path = path.clone();
                let worker_log = Arc::clone(&log);
                let joined = tokio::task::spawn_blocking(move || {
                    let outcome = converter.convert_file(&worker_path);
                    worker_log.record(&worker_path, &outcome);
                    outcome
                })
                .await;

                let outcome = joined.unwrap_or_else(|e| {
                    let outcome = FileOutcome::Failed(StageError::new(
                        Stage::StreamingRecords,
                        ScidpackError::IoErrorReadingData(format!("worker failed: {e}")),
                    ));
                    log.record(&path, &outcome);
                    outcome
                });
                (path, outcome)
            }
        })
        .buffer_unordered(jobs.max(1))
}

/// Converts `paths` and waits for every file to finish.
///
/// `on_outcome` is called once per file as it completes.
pub async fn run_batch<S, F>(
    converter: Arc<Converter<S>>,
    log: Arc<RunLog>,
    paths: Vec<PathBuf>,
    jobs: usize,
    mut on_outcome: F,
) -> BatchSummary
where
    S: RowSink + 'static,
    F: FnMut(&Path, &FileOutcome),
{
    let started = Instant::now();
    let mut summary = BatchSummary::default();

    log.note(&format!("Run started: {} files, {} workers", paths.len(), jobs.max(1)));

    let mut outcomes = std::pin::pin!(outcome_stream(converter, Arc::clone(&log), paths, jobs));
    while let Some((path, outcome)) = outcomes.next().await {
        summary.add(&outcome);
        on_outcome(&path, &outcome);
    }

    summary.elapsed = started.elapsed();
    log.note(&format!(
        "Run finished in {:.3}s: {} succeeded, {} ignored, {} failed; worst outcome {}",
        summary.elapsed.as_secs_f64(),
        summary.succeeded,
        summary.ignored,
        summary.failed,
        log.worst()
    ));

    summary
}

/// Prepared run: holidays loaded, output directory and log opened, inputs
/// discovered.
#[derive(Debug)]
pub struct Batch {
    converter: Arc<Converter<ArchiveSink>>,
    log: Arc<RunLog>,
    paths: Vec<PathBuf>,
    jobs: usize,
}

impl Batch {
    /// Prepares a run from `config`.
    ///
    /// Everything that can abort the whole run happens here, before any file
    /// is converted.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol is not a valid contract root, if the
    /// holiday file is missing or malformed, or if the output directory, run
    /// log or input directory cannot be accessed.
    pub fn prepare(config: &ConvertConfig) -> Result<Self, ScidpackError> {
        ContractName::validate_root(&config.symbol).map_err(ScidpackError::InvalidSymbol)?;

        let holidays = HolidaySet::load(config.holidays_path())?;
        tracing::info!(
            holidays = holidays.len(),
            path = %config.holidays_path().display(),
            "loaded holiday calendar"
        );

        fs::create_dir_all(&config.output_dir)?;
        let log = RunLog::create(&config.log_path())?;
        let paths = discover_inputs(&config.input_dir, &config.symbol)?;

        let converter = Converter::new(
            TimeConverter::new(config.timezone),
            Arc::new(holidays),
            Arc::new(ArchiveSink::new(&config.output_dir)),
        )
        .with_symbol(config.symbol.clone())
        .with_update_only(config.update_only);

        Ok(Self {
            converter: Arc::new(converter),
            log: Arc::new(log),
            paths,
            jobs: config.jobs,
        })
    }

    /// Returns the discovered input files.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Returns the run log.
    #[must_use]
    pub const fn log(&self) -> &Arc<RunLog> {
        &self.log
    }

    /// Converts every discovered file.
    pub async fn run<F>(self, on_outcome: F) -> BatchSummary
    where
        F: FnMut(&Path, &FileOutcome),
    {
        run_batch(self.converter, self.log, self.paths, self.jobs, on_outcome).await
    }
}

/// Prepares and runs a batch from `config`.
///
/// # Errors
///
/// Returns an error if the run cannot start; see [`Batch::prepare`].
pub async fn convert_all(config: &ConvertConfig) -> Result<BatchSummary, ScidpackError> {
    let batch = Batch::prepare(config)?;
    Ok(batch.run(|_, _| {}).await)
}
