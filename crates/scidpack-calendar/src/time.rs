//! Sierra Chart timestamp conversion.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Microseconds from the Sierra Chart epoch (1899-12-30 00:00:00 UTC) to
/// the Unix epoch.
pub const SC_EPOCH_OFFSET_MICROS: i64 = 25_569 * 86_400 * 1_000_000;

/// Converts raw `.scid` timestamps into exchange-local time.
///
/// The timezone is injected so conversions never depend on the host's zone;
/// historical DST transitions come from the IANA rules compiled into
/// `chrono-tz`. Conversion is a pure function of the raw value and is
/// therefore monotonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeConverter {
    tz: Tz,
}

impl TimeConverter {
    /// The CME equity-index exchange zone.
    pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

    /// Creates a converter for the given exchange timezone.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Returns the exchange timezone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// Converts a raw timestamp to a UTC instant.
    ///
    /// Returns `None` if the value is outside the representable range.
    #[must_use]
    pub fn to_utc(raw_timestamp: i64) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(raw_timestamp.checked_sub(SC_EPOCH_OFFSET_MICROS)?)
    }

    /// Converts a raw timestamp to exchange-local time.
    ///
    /// Returns `None` if the value is outside the representable range.
    #[must_use]
    pub fn to_local(&self, raw_timestamp: i64) -> Option<DateTime<Tz>> {
        Self::to_utc(raw_timestamp).map(|utc| utc.with_timezone(&self.tz))
    }

    /// Converts an instant back to a raw timestamp.
    #[must_use]
    pub fn to_raw<T: TimeZone>(instant: &DateTime<T>) -> i64 {
        instant.timestamp_micros() + SC_EPOCH_OFFSET_MICROS
    }
}

impl Default for TimeConverter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEZONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_epoch_offsets() {
        let sc_epoch = TimeConverter::to_utc(0).unwrap();
        assert_eq!(
            sc_epoch.naive_utc(),
            NaiveDate::from_ymd_opt(1899, 12, 30)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );

        let unix_epoch = TimeConverter::to_utc(SC_EPOCH_OFFSET_MICROS).unwrap();
        assert_eq!(unix_epoch.timestamp(), 0);
    }

    #[test]
    fn test_daylight_time() {
        let converter = TimeConverter::default();
        let utc = Utc.with_ymd_and_hms(2020, 9, 9, 22, 0, 0).unwrap();

        let local = converter.to_local(TimeConverter::to_raw(&utc)).unwrap();
        assert_eq!(local.hour(), 18); // EDT, UTC-4
    }

    #[test]
    fn test_standard_time() {
        let converter = TimeConverter::default();
        let utc = Utc.with_ymd_and_hms(2021, 1, 15, 23, 0, 0).unwrap();

        let local = converter.to_local(TimeConverter::to_raw(&utc)).unwrap();
        assert_eq!(local.hour(), 18); // EST, UTC-5
    }

    #[test]
    fn test_microseconds_preserved() {
        let utc = Utc.with_ymd_and_hms(2020, 10, 1, 13, 30, 0).unwrap();
        let raw = TimeConverter::to_raw(&utc) + 123_457;

        let local = TimeConverter::default().to_local(raw).unwrap();
        assert_eq!(local.nanosecond(), 123_457_000);
        assert_eq!(TimeConverter::to_raw(&local), raw);
    }

    #[test]
    fn test_monotonic_across_fall_back() {
        let converter = TimeConverter::default();
        // 2020-11-01 05:00Z..07:00Z spans the 02:00 EDT -> 01:00 EST fold.
        let start = TimeConverter::to_raw(&Utc.with_ymd_and_hms(2020, 11, 1, 5, 0, 0).unwrap());
        let step = 15 * 60 * 1_000_000;

        let locals: Vec<_> = (0..9)
            .map(|i| converter.to_local(start + i * step).unwrap())
            .collect();
        assert!(locals.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_out_of_range() {
        assert!(TimeConverter::to_utc(i64::MIN).is_none());
        assert!(TimeConverter::default().to_local(i64::MAX).is_none());
    }

    #[test]
    fn test_injected_timezone() {
        let converter = TimeConverter::new(chrono_tz::America::Chicago);
        let utc = Utc.with_ymd_and_hms(2020, 9, 9, 22, 0, 0).unwrap();

        let local = converter.to_local(TimeConverter::to_raw(&utc)).unwrap();
        assert_eq!(local.hour(), 17);
    }
}
