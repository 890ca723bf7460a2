//! Sierra Chart intraday record representation.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Header at the start of every `.scid` file.
///
/// The on-disk header is little-endian and 2-byte packed:
/// - `u32`: magic, the ASCII bytes `SCID` (bytes 0-3)
/// - `u32`: total header size including padding (bytes 4-7)
/// - `u32`: size of each tick record (bytes 8-11)
/// - `u16`: file format version (bytes 12-13)
///
/// Anything between byte 14 and `header_size` is reserved and skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    /// File type identifier, [`FileHeader::MAGIC`] for valid files.
    pub magic: u32,
    /// Header size in bytes, including reserved padding.
    pub header_size: u32,
    /// Size in bytes of each tick record.
    pub record_size: u32,
    /// File format version.
    pub version: u16,
}

impl FileHeader {
    /// `"SCID"` read as a little-endian `u32`.
    pub const MAGIC: u32 = 0x4449_4353;

    /// Number of bytes occupied by the decoded header fields.
    pub const ENCODED_SIZE: usize = 14;

    /// Header size written by Sierra Chart.
    pub const DEFAULT_HEADER_SIZE: u32 = 56;

    /// Creates a header with the standard magic, header size and record size.
    #[must_use]
    pub const fn new(version: u16) -> Self {
        Self {
            magic: Self::MAGIC,
            header_size: Self::DEFAULT_HEADER_SIZE,
            record_size: TickRecord::SIZE as u32,
            version,
        }
    }

    /// Returns true if the magic identifies a `.scid` file.
    #[must_use]
    pub const fn has_valid_magic(&self) -> bool {
        self.magic == Self::MAGIC
    }

    /// Number of reserved bytes following the decoded fields.
    ///
    /// Returns `None` when `header_size` is smaller than the decoded fields.
    #[must_use]
    pub const fn padding_len(&self) -> Option<usize> {
        (self.header_size as usize).checked_sub(Self::ENCODED_SIZE)
    }
}

/// A single tick as stored in a `.scid` file.
///
/// The on-disk record is 40 bytes, little-endian:
/// - `i64`: microseconds since 1899-12-30 00:00:00 UTC (bytes 0-7)
/// - `f32` x4: open, high, low, close (bytes 8-23)
/// - `u32` x4: trade count, total, bid and ask volume (bytes 24-39)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    /// Microseconds since 1899-12-30 00:00:00 UTC.
    pub raw_timestamp: i64,
    /// Open price.
    pub open: f32,
    /// High price.
    pub high: f32,
    /// Low price.
    pub low: f32,
    /// Close (last trade) price.
    pub close: f32,
    /// Number of trades.
    pub num_trades: u32,
    /// Total volume.
    pub total_volume: u32,
    /// Volume traded at the bid.
    pub bid_volume: u32,
    /// Volume traded at the ask.
    pub ask_volume: u32,
}

impl TickRecord {
    /// Size in bytes of an on-disk tick record.
    pub const SIZE: usize = 40;

    /// Creates a single-trade tick where every price field equals `price`.
    #[must_use]
    pub const fn trade(raw_timestamp: i64, price: f32, bid_volume: u32, ask_volume: u32) -> Self {
        Self {
            raw_timestamp,
            open: price,
            high: price,
            low: price,
            close: price,
            num_trades: 1,
            total_volume: bid_volume.saturating_add(ask_volume),
            bid_volume,
            ask_volume,
        }
    }
}

/// One converted, filtered and deduplicated tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    /// Exchange-local wall-clock time, truncated to the second.
    pub timestamp: NaiveDateTime,
    /// Close price.
    pub close: f32,
    /// Volume traded at the bid.
    pub bid_volume: u32,
    /// Volume traded at the ask.
    pub ask_volume: u32,
}

impl OutputRow {
    /// `strftime` pattern used for the timestamp column.
    pub const TIMESTAMP_FORMAT: &'static str = "%Y-%m-%dT%H:%M:%S";

    /// Creates an output row from a local timestamp and the source tick.
    #[must_use]
    pub fn from_tick(timestamp: NaiveDateTime, tick: &TickRecord) -> Self {
        Self {
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            close: tick.close,
            bid_volume: tick.bid_volume,
            ask_volume: tick.ask_volume,
        }
    }

    /// Returns the timestamp formatted at second precision.
    #[must_use]
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(Self::TIMESTAMP_FORMAT).to_string()
    }
}
