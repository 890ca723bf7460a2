//! CSV output format.

use std::io::Write;

use scidpack_types::OutputRow;

use crate::{FormatError, Formatter};

/// CSV formatter.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
    /// Label of the timestamp column.
    timestamp_label: String,
}

impl CsvFormatter {
    /// Default label of the timestamp column.
    pub const DEFAULT_TIMESTAMP_LABEL: &'static str = "DateTime";

    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
            timestamp_label: Self::DEFAULT_TIMESTAMP_LABEL.to_string(),
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Sets the label of the timestamp column.
    #[must_use]
    pub fn with_timestamp_label(mut self, label: impl Into<String>) -> Self {
        self.timestamp_label = label.into();
        self
    }
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for CsvFormatter {
    fn write_rows<W: Write + Send>(
        &self,
        rows: &[OutputRow],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(
                writer,
                "{}{d}Close{d}BidVolume{d}AskVolume",
                self.timestamp_label
            )?;
        }

        for row in rows {
            writeln!(
                writer,
                "{}{d}{:.2}{d}{}{d}{}",
                row.timestamp.format(OutputRow::TIMESTAMP_FORMAT),
                row.close,
                row.bid_volume,
                row.ask_volume
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn create_test_row() -> OutputRow {
        OutputRow {
            timestamp: NaiveDate::from_ymd_opt(2020, 9, 9)
                .unwrap()
                .and_hms_opt(18, 0, 5)
                .unwrap(),
            close: 3350.25,
            bid_volume: 3,
            ask_volume: 11,
        }
    }

    #[test]
    fn test_csv_rows() {
        let formatter = CsvFormatter::new();
        let mut output = Cursor::new(Vec::new());

        formatter
            .write_rows(&[create_test_row()], &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert_eq!(
            result,
            "DateTime,Close,BidVolume,AskVolume\n2020-09-09T18:00:05,3350.25,3,11\n"
        );
    }

    #[test]
    fn test_close_rounded_to_cents() {
        let row = OutputRow {
            close: 3350.0,
            ..create_test_row()
        };
        let mut output = Cursor::new(Vec::new());

        CsvFormatter::new()
            .with_header(false)
            .write_rows(&[row], &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert_eq!(result, "2020-09-09T18:00:05,3350.00,3,11\n");
    }

    #[test]
    fn test_custom_label_and_delimiter() {
        let formatter = CsvFormatter::new()
            .with_timestamp_label("Time")
            .with_delimiter(';');
        let mut output = Cursor::new(Vec::new());

        formatter.write_rows(&[], &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert_eq!(result, "Time;Close;BidVolume;AskVolume\n");
    }
}
