//! Tick filters for scidpack.
//!
//! Each filter is a small, single-pass component:
//!
//! - [`ActiveWindow`] - Contract window bounds in exchange-local time
//! - [`SessionFilter`] - Weekend, holiday and early-close session rules
//! - [`TickDeduplicator`] - Keeps the first tick of each second

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod dedup;
mod session;
mod window;

pub use dedup::TickDeduplicator;
pub use session::{SessionFilter, SessionVerdict};
pub use window::{ActiveWindow, WindowPosition};
