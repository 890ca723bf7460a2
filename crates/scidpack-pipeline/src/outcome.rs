//! Per-file outcomes and run-wide worst-outcome tracking.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};

use scidpack_types::ScidpackError;
use thiserror::Error;

/// Stage of the per-file pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Parsing the contract name out of the file name.
    ValidatingFilename,
    /// Reading the file header.
    DecodingHeader,
    /// Decoding and filtering records.
    StreamingRecords,
    /// Writing the output artifact.
    Finalizing,
}

impl Stage {
    /// Returns the stage as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidatingFilename => "validating-filename",
            Self::DecodingHeader => "decoding-header",
            Self::StreamingRecords => "streaming-records",
            Self::Finalizing => "finalizing",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error tagged with the stage it occurred in.
#[derive(Error, Debug)]
#[error("{error} (while {stage})")]
pub struct StageError {
    /// Stage the file was in.
    pub stage: Stage,
    /// The underlying error.
    #[source]
    pub error: ScidpackError,
}

impl StageError {
    /// Creates a stage error.
    #[must_use]
    pub const fn new(stage: Stage, error: ScidpackError) -> Self {
        Self { stage, error }
    }
}

/// Counters describing what happened to a file's records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Records decoded from the file.
    pub records_read: u64,
    /// Records earlier than the contract window.
    pub before_window: u64,
    /// Records on a weekend or holiday, or in the early-close gap.
    pub outside_session: u64,
    /// Records sharing a second with an earlier kept record.
    pub duplicates: u64,
    /// Rows handed to the sink.
    pub rows_written: u64,
    /// Whether decoding stopped at the window end before end of file.
    pub stopped_at_window_end: bool,
}

/// Terminal state of one file.
#[derive(Debug)]
pub enum FileOutcome {
    /// The artifact was written.
    Succeeded {
        /// Path of the artifact.
        artifact: PathBuf,
        /// Record counters.
        stats: ConversionStats,
    },
    /// Update-only mode found an existing artifact.
    Ignored {
        /// Path of the existing artifact.
        artifact: PathBuf,
    },
    /// The file could not be converted.
    Failed(StageError),
}

impl FileOutcome {
    /// Return code of a successful conversion.
    pub const SUCCESS_CODE: i32 = 0;
    /// Return code of a skipped file.
    pub const IGNORED_CODE: i32 = 1;

    /// Returns the numeric return code recorded in the run log.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Succeeded { .. } => Self::SUCCESS_CODE,
            Self::Ignored { .. } => Self::IGNORED_CODE,
            Self::Failed(failure) => failure.error.code(),
        }
    }

    /// Returns the severity used for worst-outcome tracking.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Succeeded { .. } => Severity::Success,
            Self::Ignored { .. } => Severity::Ignored,
            Self::Failed(_) => Severity::Failure,
        }
    }

    /// Returns true if the file failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Formats the run log message for the file at `path`.
    #[must_use]
    pub fn message(&self, path: &Path) -> String {
        let file = path.display();
        match self {
            Self::Succeeded { artifact, stats } => format!(
                "Converted {file} to {} ({} of {} records kept)",
                artifact.display(),
                stats.rows_written,
                stats.records_read
            ),
            Self::Ignored { artifact } => {
                format!("Ignored {file}: {} already exists", artifact.display())
            }
            Self::Failed(failure) => format!("Failed {file}: {failure}"),
        }
    }
}

/// Severity ranking of outcomes; higher is worse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    /// Every file converted.
    #[default]
    Success = 0,
    /// Some files were skipped.
    Ignored = 1,
    /// At least one file failed.
    Failure = 2,
}

impl Severity {
    /// Returns the severity as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Ignored => "ignored",
            Self::Failure => "failure",
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Success,
            1 => Self::Ignored,
            _ => Self::Failure,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Worst outcome seen so far, updated concurrently by workers.
///
/// The value only ever moves towards [`Severity::Failure`].
#[derive(Debug, Default)]
pub struct WorstOutcome {
    severity: AtomicU8,
}

impl WorstOutcome {
    /// Creates a tracker starting at [`Severity::Success`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            severity: AtomicU8::new(Severity::Success as u8),
        }
    }

    /// Folds `severity` into the worst value.
    pub fn record(&self, severity: Severity) {
        self.severity.fetch_max(severity as u8, Ordering::AcqRel);
    }

    /// Returns the worst severity recorded.
    #[must_use]
    pub fn get(&self) -> Severity {
        Severity::from_u8(self.severity.load(Ordering::Acquire))
    }

    /// Returns true if any file failed.
    #[must_use]
    pub fn any_failed(&self) -> bool {
        self.get() == Severity::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scidpack_types::ContractNameError;
    use std::sync::Arc;

    fn malformed() -> FileOutcome {
        FileOutcome::Failed(StageError::new(
            Stage::ValidatingFilename,
            ScidpackError::MalformedFuturesFileName {
                name: "ESX20.scid".to_string(),
                reason: ContractNameError::UnknownMonthCode('X'),
            },
        ))
    }

    #[test]
    fn test_outcome_codes() {
        let succeeded = FileOutcome::Succeeded {
            artifact: PathBuf::from("ESZ20.zip"),
            stats: ConversionStats::default(),
        };
        let ignored = FileOutcome::Ignored {
            artifact: PathBuf::from("ESZ20.zip"),
        };
        let truncated = FileOutcome::Failed(StageError::new(
            Stage::StreamingRecords,
            ScidpackError::IoErrorReadingData("short record".to_string()),
        ));

        assert_eq!(succeeded.code(), 0);
        assert_eq!(ignored.code(), 1);
        assert_eq!(malformed().code(), -1);
        assert_eq!(truncated.code(), -2);
        assert!(truncated.is_failure());
        assert!(!ignored.is_failure());
    }

    #[test]
    fn test_failure_message() {
        let message = malformed().message(Path::new("/data/ESX20.scid"));
        assert_eq!(
            message,
            "Failed /data/ESX20.scid: Malformed futures file name ESX20.scid: \
             unknown month code 'X' (while validating-filename)"
        );
    }

    #[test]
    fn test_worst_outcome_only_worsens() {
        let worst = WorstOutcome::new();
        assert_eq!(worst.get(), Severity::Success);

        worst.record(Severity::Ignored);
        assert_eq!(worst.get(), Severity::Ignored);

        worst.record(Severity::Failure);
        worst.record(Severity::Success);
        assert_eq!(worst.get(), Severity::Failure);
        assert!(worst.any_failed());
    }

    #[test]
    fn test_worst_outcome_concurrent() {
        let worst = Arc::new(WorstOutcome::new());

        std::thread::scope(|scope| {
            for i in 0..8 {
                let worst = Arc::clone(&worst);
                scope.spawn(move || {
                    let severity = if i == 5 {
                        Severity::Failure
                    } else {
                        Severity::Ignored
                    };
                    worst.record(severity);
                });
            }
        });

        assert_eq!(worst.get(), Severity::Failure);
    }
}
