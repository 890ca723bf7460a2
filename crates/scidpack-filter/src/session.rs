//! Trading session filter.

use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike};
use scidpack_calendar::HolidaySet;

/// Local time (seconds after midnight) at which the evening session opens.
const SESSION_OPEN_SECS: u32 = 18 * 3600;

/// Local time (seconds after midnight) of the early close ahead of a
/// non-trading day.
const EARLY_CLOSE_SECS: u32 = 16 * 3600 + 30 * 60;

/// Outcome of checking a tick against the session rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionVerdict {
    /// The tick is inside a valid session.
    Keep,
    /// The tick falls on a weekend or holiday outside the evening pre-open.
    NonTradingDay,
    /// The tick is at or after 16:30 ahead of a non-trading day.
    EarlyClose,
}

impl SessionVerdict {
    /// Returns true for [`SessionVerdict::Keep`].
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }
}

/// Holiday-aware session filter.
///
/// Rules, in order:
/// 1. Saturdays, Sundays and holidays are non-trading days.
/// 2. On a non-trading day only ticks at or after 18:00 are kept, and only
///    when the next day trades.
/// 3. When the next day does not trade, ticks at or after 16:30 are dropped.
/// 4. Everything else is kept.
#[derive(Debug, Clone, Copy)]
pub struct SessionFilter<'a> {
    holidays: &'a HolidaySet,
}

impl<'a> SessionFilter<'a> {
    /// Creates a filter over the given holiday calendar.
    #[must_use]
    pub const fn new(holidays: &'a HolidaySet) -> Self {
        Self { holidays }
    }

    /// Classifies an exchange-local timestamp.
    #[must_use]
    pub fn classify<Tz: TimeZone>(&self, timestamp: &DateTime<Tz>) -> SessionVerdict {
        self.classify_local(timestamp.naive_local())
    }

    /// Returns true if the exchange-local timestamp is kept.
    #[must_use]
    pub fn keeps<Tz: TimeZone>(&self, timestamp: &DateTime<Tz>) -> bool {
        self.classify(timestamp).is_keep()
    }

    /// Classifies a wall-clock time already expressed in exchange-local time.
    #[must_use]
    pub fn classify_local(&self, local: NaiveDateTime) -> SessionVerdict {
        let day = local.date();
        let secs = local.time().num_seconds_from_midnight();
        let next_trades = day
            .succ_opt()
            .is_some_and(|next| self.holidays.is_trading_day(next));

        if !self.holidays.is_trading_day(day) {
            return if secs >= SESSION_OPEN_SECS && next_trades {
                SessionVerdict::Keep
            } else {
                SessionVerdict::NonTradingDay
            };
        }

        if !next_trades && secs >= EARLY_CLOSE_SECS {
            return SessionVerdict::EarlyClose;
        }

        SessionVerdict::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_milli_opt(h, min, s, ms)
            .unwrap()
    }

    fn thanksgiving_2020() -> HolidaySet {
        HolidaySet::from_dates([NaiveDate::from_ymd_opt(2020, 11, 26).unwrap()]).unwrap()
    }

    #[test]
    fn test_regular_weekday_kept() {
        let holidays = HolidaySet::new();
        let filter = SessionFilter::new(&holidays);

        // Tuesday, next day Wednesday.
        assert_eq!(filter.classify_local(at(2020, 11, 17, 3, 0, 0, 0)), SessionVerdict::Keep);
        assert_eq!(filter.classify_local(at(2020, 11, 17, 17, 0, 0, 0)), SessionVerdict::Keep);
        assert_eq!(filter.classify_local(at(2020, 11, 17, 23, 59, 59, 0)), SessionVerdict::Keep);
    }

    #[test]
    fn test_holiday_evening_open_is_inclusive() {
        let holidays = thanksgiving_2020();
        let filter = SessionFilter::new(&holidays);

        assert_eq!(
            filter.classify_local(at(2020, 11, 26, 18, 0, 0, 0)),
            SessionVerdict::Keep
        );
        assert_eq!(
            filter.classify_local(at(2020, 11, 26, 17, 59, 59, 999)),
            SessionVerdict::NonTradingDay
        );
        assert_eq!(
            filter.classify_local(at(2020, 11, 26, 10, 0, 0, 0)),
            SessionVerdict::NonTradingDay
        );
    }

    #[test]
    fn test_early_close_before_holiday() {
        let holidays = thanksgiving_2020();
        let filter = SessionFilter::new(&holidays);

        assert_eq!(
            filter.classify_local(at(2020, 11, 25, 16, 30, 0, 0)),
            SessionVerdict::EarlyClose
        );
        assert_eq!(
            filter.classify_local(at(2020, 11, 25, 16, 29, 59, 0)),
            SessionVerdict::Keep
        );
    }

    #[test]
    fn test_weekend() {
        let holidays = HolidaySet::new();
        let filter = SessionFilter::new(&holidays);

        // Friday afternoon ahead of Saturday.
        assert_eq!(
            filter.classify_local(at(2020, 11, 20, 16, 45, 0, 0)),
            SessionVerdict::EarlyClose
        );
        // Saturday evening still leads into Sunday.
        assert_eq!(
            filter.classify_local(at(2020, 11, 21, 19, 0, 0, 0)),
            SessionVerdict::NonTradingDay
        );
        // Sunday evening opens Monday's session.
        assert_eq!(filter.classify_local(at(2020, 11, 22, 18, 0, 0, 0)), SessionVerdict::Keep);
        assert_eq!(
            filter.classify_local(at(2020, 11, 22, 12, 0, 0, 0)),
            SessionVerdict::NonTradingDay
        );
    }

    #[test]
    fn test_holiday_evening_before_weekend_dropped() {
        // Friday holiday: evening leads into Saturday, so nothing is kept.
        let holidays =
            HolidaySet::from_dates([NaiveDate::from_ymd_opt(2020, 12, 25).unwrap()]).unwrap();
        let filter = SessionFilter::new(&holidays);

        assert_eq!(
            filter.classify_local(at(2020, 12, 25, 18, 30, 0, 0)),
            SessionVerdict::NonTradingDay
        );
        // Thursday ahead of the holiday closes early.
        assert_eq!(
            filter.classify_local(at(2020, 12, 24, 16, 30, 0, 0)),
            SessionVerdict::EarlyClose
        );
    }

    #[test]
    fn test_keeps_zoned() {
        let holidays = thanksgiving_2020();
        let filter = SessionFilter::new(&holidays);
        let tz: scidpack_calendar::Tz = "America/New_York".parse().unwrap();

        let open = tz
            .from_local_datetime(&at(2020, 11, 26, 18, 0, 0, 0))
            .single()
            .unwrap();
        assert!(filter.keeps(&open));
    }
}
