//! Sierra Chart `.scid` binary decoding and encoding.
//!
//! This crate maps the on-disk intraday format to and from
//! [`scidpack_types::FileHeader`] and [`scidpack_types::TickRecord`]:
//!
//! - [`ScidReader`] - Header validation and streaming record decoding
//! - [`ScidWriter`] - Writes headers and records in the same layout
//! - [`decode_header`] / [`decode_record`] - Fixed-offset field parsing
//! - [`encode_header`] / [`encode_record`] - Fixed-offset field encoding

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod reader;
mod writer;

pub use reader::{DecodeError, ScidReader, decode_header, decode_record, record_count};
pub use writer::{ScidWriter, encode_header, encode_record};
