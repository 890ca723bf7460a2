//! Core types for the scidpack Sierra Chart tick converter.
//!
//! This crate provides the fundamental data structures used throughout scidpack:
//!
//! - [`FileHeader`] - The fixed header at the start of a `.scid` file
//! - [`TickRecord`] - A single on-disk intraday record
//! - [`OutputRow`] - A converted row destined for CSV output
//! - [`ContractName`] - A parsed futures contract file name
//! - [`ContractWindow`] - The active date window of a contract

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod contract;
mod error;
mod tick;
mod window;

pub use contract::{ContractName, MonthCode};
pub use error::{ContractNameError, HolidayError, Result, ScidpackError};
pub use tick::{FileHeader, OutputRow, TickRecord};
pub use window::ContractWindow;
