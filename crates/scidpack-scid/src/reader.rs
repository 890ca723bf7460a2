//! Streaming `.scid` decoding.

use std::io::{self, Read};

use byteorder::{ByteOrder, LittleEndian};
use scidpack_types::{FileHeader, TickRecord};
use thiserror::Error;

/// Errors that can occur while decoding a `.scid` stream.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The file does not start with `SCID`.
    #[error("Bad magic 0x{0:08x} (expected \"SCID\")")]
    BadMagic(u32),

    /// The header claims to be smaller than its own fields.
    #[error("Header size {0} is smaller than the {min} decoded bytes", min = FileHeader::ENCODED_SIZE)]
    HeaderTooSmall(u32),

    /// The header's record size differs from the known record layout.
    #[error("Record size {found} does not match expected {expected}")]
    RecordSize {
        /// The record size this decoder understands.
        expected: usize,
        /// The record size declared in the header.
        found: u32,
    },

    /// The stream ended in the middle of a header or record.
    #[error("Truncated {what} at byte offset {offset}")]
    Truncated {
        /// `"header"` or `"record"`.
        what: &'static str,
        /// Byte offset at which the incomplete item starts.
        offset: u64,
    },

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Decodes the fixed header fields from their 14 on-disk bytes.
///
/// Layout (little-endian, no padding):
/// - bytes 0-3: magic
/// - bytes 4-7: header size
/// - bytes 8-11: record size
/// - bytes 12-13: version
#[must_use]
pub fn decode_header(data: &[u8; FileHeader::ENCODED_SIZE]) -> FileHeader {
    FileHeader {
        magic: LittleEndian::read_u32(&data[0..4]),
        header_size: LittleEndian::read_u32(&data[4..8]),
        record_size: LittleEndian::read_u32(&data[8..12]),
        version: LittleEndian::read_u16(&data[12..14]),
    }
}

/// Decodes a tick record from its 40 on-disk bytes.
///
/// Layout (little-endian, no padding):
/// - bytes 0-7: timestamp (`i64` microseconds)
/// - bytes 8-23: open, high, low, close (`f32`)
/// - bytes 24-39: trades, total, bid and ask volume (`u32`)
#[inline]
#[must_use]
pub fn decode_record(data: &[u8; TickRecord::SIZE]) -> TickRecord {
    TickRecord {
        raw_timestamp: LittleEndian::read_i64(&data[0..8]),
        open: LittleEndian::read_f32(&data[8..12]),
        high: LittleEndian::read_f32(&data[12..16]),
        low: LittleEndian::read_f32(&data[16..20]),
        close: LittleEndian::read_f32(&data[20..24]),
        num_trades: LittleEndian::read_u32(&data[24..28]),
        total_volume: LittleEndian::read_u32(&data[28..32]),
        bid_volume: LittleEndian::read_u32(&data[32..36]),
        ask_volume: LittleEndian::read_u32(&data[36..40]),
    }
}

/// Returns the number of whole records in a file of the given length.
#[must_use]
pub const fn record_count(file_len: u64, header_size: u32) -> u64 {
    file_len.saturating_sub(header_size as u64) / TickRecord::SIZE as u64
}

/// Streaming reader over a `.scid` byte stream.
///
/// The header is decoded and validated on construction; records are then
/// decoded one at a time, either via [`ScidReader::next_record`] or by
/// iterating.
#[derive(Debug)]
pub struct ScidReader<R> {
    reader: R,
    header: FileHeader,
    offset: u64,
    finished: bool,
}

impl<R: Read> ScidReader<R> {
    /// Reads and validates the header, skipping any reserved padding.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is truncated, has the wrong magic,
    /// declares an unexpected record size, or cannot be read.
    pub fn new(mut reader: R) -> Result<Self, DecodeError> {
        let mut buf = [0u8; FileHeader::ENCODED_SIZE];
        let read = read_full(&mut reader, &mut buf)?;
        if read < buf.len() {
            return Err(DecodeError::Truncated {
                what: "header",
                offset: 0,
            });
        }

        let header = decode_header(&buf);
        if !header.has_valid_magic() {
            return Err(DecodeError::BadMagic(header.magic));
        }
        if header.record_size as usize != TickRecord::SIZE {
            return Err(DecodeError::RecordSize {
                expected: TickRecord::SIZE,
                found: header.record_size,
            });
        }

        let padding = header
            .padding_len()
            .ok_or(DecodeError::HeaderTooSmall(header.header_size))? as u64;
        let skipped = io::copy(&mut reader.by_ref().take(padding), &mut io::sink())?;
        if skipped < padding {
            return Err(DecodeError::Truncated {
                what: "header",
                offset: 0,
            });
        }

        Ok(Self {
            reader,
            header,
            offset: u64::from(header.header_size),
            finished: false,
        })
    }

    /// Returns the decoded header.
    #[must_use]
    pub const fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Returns the byte offset of the next record.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Decodes the next record.
    ///
    /// Returns `Ok(None)` at a clean end of stream.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Truncated`] if the stream ends inside a record.
    pub fn next_record(&mut self) -> Result<Option<TickRecord>, DecodeError> {
        let mut buf = [0u8; TickRecord::SIZE];
        match read_full(&mut self.reader, &mut buf)? {
            0 => Ok(None),
            TickRecord::SIZE => {
                self.offset += TickRecord::SIZE as u64;
                Ok(Some(decode_record(&buf)))
            }
            _ => Err(DecodeError::Truncated {
                what: "record",
                offset: self.offset,
            }),
        }
    }

    /// Consumes the reader, returning the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for ScidReader<R> {
    type Item = Result<TickRecord, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Fills `buf` as far as the stream allows, returning the bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
