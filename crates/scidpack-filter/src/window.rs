//! Contract window bounds check.

use chrono::{DateTime, TimeZone};
use scidpack_types::ContractWindow;

/// Where a tick falls relative to an [`ActiveWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowPosition {
    /// Before the window opens; the tick is dropped.
    Before,
    /// Inside the window.
    Inside,
    /// At or past the window close. Since ticks are time-ordered, nothing
    /// after this point can be inside either.
    After,
}

/// A [`ContractWindow`] resolved to instants in the exchange timezone.
#[derive(Debug, Clone)]
pub struct ActiveWindow<Tz: TimeZone> {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl<Tz: TimeZone> ActiveWindow<Tz> {
    /// Resolves the window's local roll points in `tz`.
    ///
    /// Returns `None` if a bound cannot be represented.
    #[must_use]
    pub fn resolve(window: &ContractWindow, tz: &Tz) -> Option<Self> {
        let (start, end) = window.local_bounds(tz)?;
        Some(Self { start, end })
    }

    /// Returns the inclusive start.
    #[must_use]
    pub const fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    /// Returns the exclusive end.
    #[must_use]
    pub const fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    /// Classifies a timestamp against the window.
    #[must_use]
    pub fn position<T: TimeZone>(&self, timestamp: &DateTime<T>) -> WindowPosition {
        if *timestamp < self.start {
            WindowPosition::Before
        } else if *timestamp >= self.end {
            WindowPosition::After
        } else {
            WindowPosition::Inside
        }
    }
}
