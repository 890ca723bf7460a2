//! Output formatting and packaging for scidpack.
//!
//! - [`CsvFormatter`] - Renders rows as `timestamp,Close,BidVolume,AskVolume`
//! - [`ArchiveSink`] - Writes one zip archive holding a CSV per contract
//! - [`RowSink`] - The writer/archiver seam used by the conversion pipeline

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod archive;
mod csv;
mod formatter;

pub use crate::csv::CsvFormatter;
pub use archive::{ARCHIVE_EXTENSION, ArchiveSink, read_entry};
pub use formatter::{FormatError, Formatter, RowSink};
