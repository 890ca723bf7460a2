//! Convert Sierra Chart `.scid` futures tick files into compressed
//! per-second CSV.
//!
//! This is a facade crate that re-exports functionality from the scidpack
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use scidpack_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConvertConfig::new("data", "out")
//!         .with_holidays("holidays.txt")
//!         .with_symbol("ES");
//!
//!     let batch = Batch::prepare(&config)?;
//!     let summary = batch
//!         .run(|path, outcome| println!("{}: {}", path.display(), outcome.code()))
//!         .await;
//!
//!     println!("worst outcome: {:?}", summary.worst);
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use scidpack_types::*;

// Re-export the binary codec
pub use scidpack_scid::{
    DecodeError, ScidReader, ScidWriter, decode_header, decode_record, encode_header,
    encode_record, record_count,
};

// Re-export time and calendar
pub use scidpack_calendar::{HolidaySet, SC_EPOCH_OFFSET_MICROS, TimeConverter, Tz};

// Re-export filters
#[cfg(feature = "filter")]
pub use scidpack_filter::{
    ActiveWindow, SessionFilter, SessionVerdict, TickDeduplicator, WindowPosition,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use scidpack_format::{
    ARCHIVE_EXTENSION, ArchiveSink, CsvFormatter, FormatError, Formatter, RowSink, read_entry,
};

// Re-export the pipeline
#[cfg(feature = "pipeline")]
pub use scidpack_pipeline::{
    Batch, BatchSummary, Conversion, ConversionStats, ConvertConfig, Converter, FileOutcome,
    RunLog, SCID_EXTENSION, Severity, Stage, StageError, WorstOutcome, convert_all,
    default_jobs, discover_inputs, outcome_stream, run_batch,
};

/// Prelude module for convenient imports.
///
/// ```
/// use scidpack_lib::prelude::*;
/// ```
pub mod prelude {
    pub use scidpack_types::{
        ContractName, ContractWindow, FileHeader, MonthCode, OutputRow, Result, ScidpackError,
        TickRecord,
    };

    pub use scidpack_calendar::{HolidaySet, TimeConverter, Tz};
    pub use scidpack_scid::ScidReader;

    #[cfg(feature = "filter")]
    pub use scidpack_filter::{SessionFilter, TickDeduplicator};

    #[cfg(feature = "format")]
    pub use scidpack_format::{ArchiveSink, CsvFormatter, RowSink};

    #[cfg(feature = "pipeline")]
    pub use scidpack_pipeline::{
        Batch, BatchSummary, ConvertConfig, Converter, FileOutcome, RunLog, Severity,
        convert_all,
    };
}
