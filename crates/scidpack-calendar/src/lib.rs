//! Holiday calendar and exchange time conversion for scidpack.
//!
//! - [`HolidaySet`] - Strictly ascending set of market holidays
//! - [`TimeConverter`] - Sierra Chart timestamp to exchange-local time

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod holiday;
mod time;

pub use chrono_tz::Tz;
pub use holiday::HolidaySet;
pub use time::{SC_EPOCH_OFFSET_MICROS, TimeConverter};
