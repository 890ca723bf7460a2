//! Per-file conversion.
//!
//! A file moves through [`Stage::ValidatingFilename`],
//! [`Stage::DecodingHeader`], [`Stage::StreamingRecords`] and
//! [`Stage::Finalizing`], ending as a [`FileOutcome`]. All per-file state
//! (the deduplicator, the collected rows) lives on the worker's stack; only
//! the holiday set and the sink are shared.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use scidpack_calendar::{HolidaySet, TimeConverter};
use scidpack_filter::{
    ActiveWindow, SessionFilter, SessionVerdict, TickDeduplicator, WindowPosition,
};
use scidpack_format::RowSink;
use scidpack_scid::ScidReader;
use scidpack_types::{ContractName, ContractNameError, OutputRow, ScidpackError};

use crate::{ConversionStats, FileOutcome, Stage, StageError};

/// Rows produced from one file, with their counters.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    /// Rows in time order, at most one per local second.
    pub rows: Vec<OutputRow>,
    /// What happened to the decoded records.
    pub stats: ConversionStats,
}

/// Converts `.scid` files into artifacts through a [`RowSink`].
///
/// A converter is immutable and shared by every worker in a batch.
#[derive(Debug)]
pub struct Converter<S> {
    time: TimeConverter,
    holidays: Arc<HolidaySet>,
    sink: Arc<S>,
    symbol: Option<String>,
    update_only: bool,
}

impl<S: RowSink> Converter<S> {
    /// Creates a converter accepting any symbol root, overwriting artifacts.
    #[must_use]
    pub const fn new(time: TimeConverter, holidays: Arc<HolidaySet>, sink: Arc<S>) -> Self {
        Self {
            time,
            holidays,
            sink,
            symbol: None,
            update_only: false,
        }
    }

    /// Requires file names to start with `symbol`.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Skips files whose artifact already exists.
    #[must_use]
    pub fn with_update_only(mut self, update_only: bool) -> Self {
        self.update_only = update_only;
        self
    }

    /// Returns the sink.
    #[must_use]
    pub const fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    /// Converts the file at `path`.
    ///
    /// Never panics on bad input; every failure is reported in the returned
    /// outcome and affects this file only.
    pub fn convert_file(&self, path: &Path) -> FileOutcome {
        let span = tracing::debug_span!("convert", file = %path.display());
        let _guard = span.enter();

        let contract = match ContractName::from_path(path, self.symbol.as_deref()) {
            Ok(contract) => contract,
            Err(error) => {
                return FileOutcome::Failed(StageError::new(Stage::ValidatingFilename, error));
            }
        };
        let base_name = contract.base_name();

        if self.update_only {
            let artifact = self.sink.artifact_path(&base_name);
            if artifact.exists() {
                return FileOutcome::Ignored { artifact };
            }
        }

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                return FileOutcome::Failed(StageError::new(
                    Stage::DecodingHeader,
                    ScidpackError::IoErrorReadingData(e.to_string()),
                ));
            }
        };

        let conversion = match self.convert_reader(&contract, BufReader::new(file)) {
            Ok(conversion) => conversion,
            Err(failure) => return FileOutcome::Failed(failure),
        };
        let stats = conversion.stats;
        tracing::debug!(
            read = stats.records_read,
            before_window = stats.before_window,
            outside_session = stats.outside_session,
            duplicates = stats.duplicates,
            rows = stats.rows_written,
            "filtered records"
        );

        match self.sink.finalize(&base_name, &conversion.rows) {
            Ok(artifact) => FileOutcome::Succeeded { artifact, stats },
            Err(e) => FileOutcome::Failed(StageError::new(
                Stage::Finalizing,
                ScidpackError::Format(e.to_string()),
            )),
        }
    }

    /// Decodes and filters the records of `contract` read from `reader`.
    ///
    /// Decoding stops at the first record at or past the window end, so any
    /// damage after that point goes unnoticed.
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be resolved, the stream is not a
    /// valid `.scid` stream, or a timestamp is out of range.
    pub fn convert_reader<R: Read>(
        &self,
        contract: &ContractName,
        reader: R,
    ) -> Result<Conversion, StageError> {
        let contract_window = contract.window();
        let window = ActiveWindow::resolve(&contract_window, &self.time.timezone())
            .ok_or_else(|| {
                StageError::new(
                    Stage::ValidatingFilename,
                    ScidpackError::MalformedFuturesFileName {
                        name: contract.base_name(),
                        reason: ContractNameError::UnresolvableWindow(contract_window.to_string()),
                    },
                )
            })?;

        let mut reader = ScidReader::new(reader).map_err(|e| {
            StageError::new(Stage::DecodingHeader, ScidpackError::IoErrorReadingData(e.to_string()))
        })?;

        let session = SessionFilter::new(&self.holidays);
        let mut dedup = TickDeduplicator::new();
        let mut conversion = Conversion::default();
        let stats = &mut conversion.stats;

        loop {
            let offset = reader.offset();
            let record = match reader.next_record() {
                Ok(Some(record)) => record,
                Ok(None) => break,
                Err(e) => {
                    return Err(StageError::new(
                        Stage::StreamingRecords,
                        ScidpackError::IoErrorReadingData(e.to_string()),
                    ));
                }
            };
            stats.records_read += 1;

            let local = self.time.to_local(record.raw_timestamp).ok_or_else(|| {
                StageError::new(
                    Stage::StreamingRecords,
                    ScidpackError::IoErrorReadingData(format!(
                        "timestamp {} out of range at offset {offset}",
                        record.raw_timestamp
                    )),
                )
            })?;

            match window.position(&local) {
                WindowPosition::Before => {
                    stats.before_window += 1;
                    continue;
                }
                WindowPosition::After => {
                    stats.stopped_at_window_end = true;
                    break;
                }
                WindowPosition::Inside => {}
            }

            match session.classify(&local) {
                SessionVerdict::Keep => {}
                SessionVerdict::NonTradingDay | SessionVerdict::EarlyClose => {
                    stats.outside_session += 1;
                    continue;
                }
            }

            if !dedup.admit(&local) {
                stats.duplicates += 1;
                continue;
            }

            conversion
                .rows
                .push(OutputRow::from_tick(local.naive_local(), &record));
        }

        conversion.stats.rows_written = conversion.rows.len() as u64;
        Ok(conversion)
    }
}
