//! Conversion pipeline for scidpack.
//!
//! - [`Converter`] - Per-file state machine from file name to artifact
//! - [`RunLog`] - Append-only log shared by all workers
//! - [`Batch`] - Discovery and bounded parallel conversion of a directory

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod batch;
mod config;
mod converter;
mod log;
mod outcome;

pub use batch::{
    Batch, BatchSummary, SCID_EXTENSION, convert_all, discover_inputs, outcome_stream, run_batch,
};
pub use config::{ConvertConfig, default_jobs};
pub use converter::{Conversion, Converter};
pub use log::RunLog;
pub use outcome::{ConversionStats, FileOutcome, Severity, Stage, StageError, WorstOutcome};
