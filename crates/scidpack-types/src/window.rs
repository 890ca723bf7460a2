//! Active date window of a futures contract.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::MonthCode;

/// The span of months during which a contract's ticks are kept.
///
/// Bounds are exchange-local: the window opens on the 9th of the start month
/// at 18:00 (inclusive) and closes on the 9th of the end month at 18:00
/// (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractWindow {
    /// Year the window opens.
    pub start_year: i32,
    /// Month (1-12) the window opens.
    pub start_month: u32,
    /// Year the window closes.
    pub end_year: i32,
    /// Month (1-12) the window closes.
    pub end_month: u32,
}

impl ContractWindow {
    /// Day of month on which windows roll.
    pub const ROLL_DAY: u32 = 9;
    /// Local hour at which windows roll.
    pub const ROLL_HOUR: u32 = 18;

    /// Resolves the window for a contract month code and four-digit year.
    ///
    /// The window opens three months before delivery. March contracts open in
    /// December of the prior year; December contracts stay active until the
    /// March roll of the following year.
    #[must_use]
    pub const fn for_contract(code: MonthCode, year: i32) -> Self {
        let delivery = code.delivery_month();
        match code {
            MonthCode::March => Self {
                start_year: year - 1,
                start_month: 12,
                end_year: year,
                end_month: delivery,
            },
            MonthCode::December => Self {
                start_year: year,
                start_month: delivery - 3,
                end_year: year + 1,
                end_month: 3,
            },
            MonthCode::June | MonthCode::September => Self {
                start_year: year,
                start_month: delivery - 3,
                end_year: year,
                end_month: delivery,
            },
        }
    }

    /// Returns the local wall-clock time the window opens.
    #[must_use]
    pub fn start(&self) -> Option<NaiveDateTime> {
        roll_point(self.start_year, self.start_month)
    }

    /// Returns the local wall-clock time the window closes.
    #[must_use]
    pub fn end(&self) -> Option<NaiveDateTime> {
        roll_point(self.end_year, self.end_month)
    }

    /// Resolves both bounds as instants in the given exchange timezone.
    ///
    /// Returns `None` if either bound is not representable in `tz`.
    #[must_use]
    pub fn local_bounds<Tz: TimeZone>(&self, tz: &Tz) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
        let start = tz.from_local_datetime(&self.start()?).earliest()?;
        let end = tz.from_local_datetime(&self.end()?).earliest()?;
        Some((start, end))
    }

    /// Returns the number of calendar months between the bounds.
    #[must_use]
    pub const fn months_wide(&self) -> i32 {
        (self.end_year * 12 + self.end_month as i32) - (self.start_year * 12 + self.start_month as i32)
    }
}

impl std::fmt::Display for ContractWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{:02}-{:02} {:02}:00 to {}-{:02}-{:02} {:02}:00",
            self.start_year,
            self.start_month,
            Self::ROLL_DAY,
            Self::ROLL_HOUR,
            self.end_year,
            self.end_month,
            Self::ROLL_DAY,
            Self::ROLL_HOUR
        )
    }
}

fn roll_point(year: i32, month: u32) -> Option<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(year, month, ContractWindow::ROLL_DAY)?;
    let time = NaiveTime::from_hms_opt(ContractWindow::ROLL_HOUR, 0, 0)?;
    Some(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike, Utc};

    #[test]
    fn test_march_wraps_into_prior_december() {
        let window = ContractWindow::for_contract(MonthCode::March, 2021);
        assert_eq!((window.start_year, window.start_month), (2020, 12));
        assert_eq!((window.end_year, window.end_month), (2021, 3));
        assert_eq!(window.months_wide(), 3);
    }

    #[test]
    fn test_mid_year_windows() {
        let june = ContractWindow::for_contract(MonthCode::June, 2021);
        assert_eq!((june.start_year, june.start_month), (2021, 3));
        assert_eq!((june.end_year, june.end_month), (2021, 6));
        assert_eq!(june.months_wide(), 3);

        let sept = ContractWindow::for_contract(MonthCode::September, 2021);
        assert_eq!((sept.start_year, sept.start_month), (2021, 6));
        assert_eq!((sept.end_year, sept.end_month), (2021, 9));
        assert_eq!(sept.months_wide(), 3);
    }

    #[test]
    fn test_december_rolls_into_next_march() {
        let window = ContractWindow::for_contract(MonthCode::December, 2020);
        assert_eq!((window.start_year, window.start_month), (2020, 9));
        assert_eq!((window.end_year, window.end_month), (2021, 3));
    }

    #[test]
    fn test_windows_are_ordered() {
        for &code in MonthCode::all() {
            let window = ContractWindow::for_contract(code, 2020);
            assert!(window.start().unwrap() < window.end().unwrap(), "{code}");
        }
    }

    #[test]
    fn test_roll_points() {
        let window = ContractWindow::for_contract(MonthCode::December, 2020);
        let start = window.start().unwrap();
        assert_eq!((start.year(), start.month(), start.day()), (2020, 9, 9));
        assert_eq!(start.hour(), 18);
        assert_eq!(window.to_string(), "2020-09-09 18:00 to 2021-03-09 18:00");
    }

    #[test]
    fn test_local_bounds_utc() {
        let window = ContractWindow::for_contract(MonthCode::June, 2022);
        let (start, end) = window.local_bounds(&Utc).unwrap();
        assert_eq!(start.naive_utc(), window.start().unwrap());
        assert_eq!(end.naive_utc(), window.end().unwrap());
    }
}
