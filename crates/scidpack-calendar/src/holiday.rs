//! Market holiday calendar.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};
use scidpack_types::HolidayError;

/// Ordered set of market holidays.
///
/// Dates are strictly ascending and unique; any violation is rejected while
/// loading so lookups can binary-search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    dates: Vec<NaiveDate>,
}

impl HolidaySet {
    /// Format of one holiday file line.
    pub const DATE_FORMAT: &'static str = "%Y-%m-%d";

    /// Creates an empty set (weekends are still non-trading days).
    #[must_use]
    pub const fn new() -> Self {
        Self { dates: Vec::new() }
    }

    /// Builds a set from dates that must already be strictly ascending.
    ///
    /// # Errors
    ///
    /// Returns an error on the first duplicate or out-of-order date; the
    /// reported line is the one-based position in `dates`.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Result<Self, HolidayError> {
        let mut set = Self::new();
        for (idx, date) in dates.into_iter().enumerate() {
            set.push(idx + 1, date)?;
        }
        Ok(set)
    }

    /// Parses holiday file contents, one `YYYY-MM-DD` date per line.
    ///
    /// Blank lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a line is unparseable, duplicated, or out of order.
    pub fn parse(text: &str) -> Result<Self, HolidayError> {
        Self::from_reader(text.as_bytes())
    }

    /// Reads a holiday file from any buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or a line is invalid.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, HolidayError> {
        let mut set = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| HolidayError::Read(e.to_string()))?;
            let text = line.trim();
            if text.is_empty() {
                continue;
            }

            let date = NaiveDate::parse_from_str(text, Self::DATE_FORMAT).map_err(|_| {
                HolidayError::Unparseable {
                    line: idx + 1,
                    text: text.to_string(),
                }
            })?;
            set.push(idx + 1, date)?;
        }
        Ok(set)
    }

    /// Loads the holiday file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is invalid.
    pub fn load(path: &Path) -> Result<Self, HolidayError> {
        let file = File::open(path)
            .map_err(|e| HolidayError::Read(format!("{}: {e}", path.display())))?;
        let set = Self::from_reader(BufReader::new(file))?;

        tracing::debug!(
            path = %path.display(),
            holidays = set.len(),
            "loaded holiday calendar"
        );
        Ok(set)
    }

    fn push(&mut self, line: usize, date: NaiveDate) -> Result<(), HolidayError> {
        if let Some(&previous) = self.dates.last() {
            if date == previous {
                return Err(HolidayError::Duplicate { line, date });
            }
            if date < previous {
                return Err(HolidayError::OutOfOrder {
                    line,
                    date,
                    previous,
                });
            }
        }
        self.dates.push(date);
        Ok(())
    }

    /// Returns true if `date` is a listed holiday.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.binary_search(&date).is_ok()
    }

    /// Returns true if `date` is neither a weekend nor a holiday.
    #[must_use]
    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.contains(date)
    }

    /// Returns the holidays in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    /// Returns the number of holidays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if no holidays are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
