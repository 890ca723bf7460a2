//! Info command implementation.
//!
//! Displays the decoded header of a `.scid` file, its record count and the
//! exchange-local time of its first and last ticks.

use crate::display::format_local;
use anyhow::{Context, Result};
use scidpack_lib::{decode_record, record_count};
use scidpack_lib::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Summary of a `.scid` file.
#[derive(Debug, Serialize)]
struct FileInfo {
    path: String,
    contract: Option<String>,
    window: Option<String>,
    header: FileHeader,
    records: u64,
    trailing_bytes: u64,
    first_tick: Option<String>,
    last_tick: Option<String>,
}

/// Show the header and tick range of a `.scid` file.
pub(crate) fn show_info(path: &Path, timezone: Tz, json: bool) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let file_len = file.metadata()?.len();

    let mut reader = ScidReader::new(BufReader::new(file))
        .with_context(|| format!("Cannot decode header of {}", path.display()))?;
    let header = *reader.header();
    let data_len = file_len.saturating_sub(u64::from(header.header_size));
    let records = record_count(file_len, header.header_size);

    let first = if records > 0 {
        reader.next_record()?
    } else {
        None
    };
    let last = if records > 1 {
        let mut inner = reader.into_inner();
        let offset = u64::from(header.header_size) + (records - 1) * TickRecord::SIZE as u64;
        inner.seek(SeekFrom::Start(offset))?;
        let mut buf = [0u8; TickRecord::SIZE];
        inner.read_exact(&mut buf)?;
        Some(decode_record(&buf))
    } else {
        first
    };

    let time = TimeConverter::new(timezone);
    let local = |record: Option<TickRecord>| {
        record.map(|r| {
            time.to_local(r.raw_timestamp).map_or_else(
                || format!("out of range ({})", r.raw_timestamp),
                |t| format_local(&t),
            )
        })
    };

    let contract = ContractName::from_path(path, None).ok();
    let info = FileInfo {
        path: path.display().to_string(),
        contract: contract.as_ref().map(ToString::to_string),
        window: contract.as_ref().map(|c| c.window().to_string()),
        header,
        records,
        trailing_bytes: data_len % TickRecord::SIZE as u64,
        first_tick: local(first),
        last_tick: local(last),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("File:        {}", info.path);
    if let (Some(contract), Some(window)) = (&info.contract, &info.window) {
        println!("Contract:    {contract}");
        println!("Window:      {window} ({timezone})");
    }
    println!("Version:     {}", header.version);
    println!("Header size: {} bytes", header.header_size);
    println!("Record size: {} bytes", header.record_size);
    println!("Records:     {}", info.records);
    if info.trailing_bytes > 0 {
        println!("Trailing:    {} bytes (truncated record)", info.trailing_bytes);
    }
    if let (Some(first), Some(last)) = (&info.first_tick, &info.last_tick) {
        println!("First tick:  {first}");
        println!("Last tick:   {last}");
    }

    Ok(())
}
