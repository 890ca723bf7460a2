//! `.scid` encoding.

use std::io::{self, Write};

use byteorder::{ByteOrder, LittleEndian};
use scidpack_types::{FileHeader, TickRecord};

/// Encodes the fixed header fields into their 14 on-disk bytes.
#[must_use]
pub fn encode_header(header: &FileHeader) -> [u8; FileHeader::ENCODED_SIZE] {
    let mut bytes = [0u8; FileHeader::ENCODED_SIZE];
    LittleEndian::write_u32(&mut bytes[0..4], header.magic);
    LittleEndian::write_u32(&mut bytes[4..8], header.header_size);
    LittleEndian::write_u32(&mut bytes[8..12], header.record_size);
    LittleEndian::write_u16(&mut bytes[12..14], header.version);
    bytes
}

/// Encodes a tick record into its 40 on-disk bytes.
#[must_use]
pub fn encode_record(record: &TickRecord) -> [u8; TickRecord::SIZE] {
    let mut bytes = [0u8; TickRecord::SIZE];
    LittleEndian::write_i64(&mut bytes[0..8], record.raw_timestamp);
    LittleEndian::write_f32(&mut bytes[8..12], record.open);
    LittleEndian::write_f32(&mut bytes[12..16], record.high);
    LittleEndian::write_f32(&mut bytes[16..20], record.low);
    LittleEndian::write_f32(&mut bytes[20..24], record.close);
    LittleEndian::write_u32(&mut bytes[24..28], record.num_trades);
    LittleEndian::write_u32(&mut bytes[28..32], record.total_volume);
    LittleEndian::write_u32(&mut bytes[32..36], record.bid_volume);
    LittleEndian::write_u32(&mut bytes[36..40], record.ask_volume);
    bytes
}

/// Writes a `.scid` stream: header, zeroed reserved bytes, then records.
#[derive(Debug)]
pub struct ScidWriter<W: Write> {
    writer: W,
    records: u64,
}

impl<W: Write> ScidWriter<W> {
    /// Writes the header (padded to `header_size`) and returns the writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn new(mut writer: W, header: &FileHeader) -> io::Result<Self> {
        writer.write_all(&encode_header(header))?;
        let padding = header.padding_len().unwrap_or(0);
        writer.write_all(&vec![0u8; padding])?;
        Ok(Self { writer, records: 0 })
    }

    /// Appends a record.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_record(&mut self, record: &TickRecord) -> io::Result<()> {
        self.writer.write_all(&encode_record(record))?;
        self.records += 1;
        Ok(())
    }

    /// Returns the number of records written so far.
    #[must_use]
    pub const fn records_written(&self) -> u64 {
        self.records
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode_header;

    #[test]
    fn test_encode_header_layout() {
        let bytes = encode_header(&FileHeader::new(2));
        assert_eq!(&bytes[0..4], b"SCID");
        assert_eq!(LittleEndian::read_u32(&bytes[4..8]), 56);
        assert_eq!(LittleEndian::read_u32(&bytes[8..12]), 40);
        assert_eq!(LittleEndian::read_u16(&bytes[12..14]), 2);
        assert_eq!(decode_header(&bytes), FileHeader::new(2));
    }

    #[test]
    fn test_writer_pads_header() {
        let mut writer = ScidWriter::new(Vec::new(), &FileHeader::new(1)).unwrap();
        writer
            .write_record(&TickRecord::trade(-5, 10.5, 1, 2))
            .unwrap();
        assert_eq!(writer.records_written(), 1);

        let bytes = writer.finish().unwrap();
        assert_eq!(bytes.len(), 56 + 40);
        assert!(bytes[14..56].iter().all(|&b| b == 0));
        assert_eq!(LittleEndian::read_i64(&bytes[56..64]), -5);
    }
}
