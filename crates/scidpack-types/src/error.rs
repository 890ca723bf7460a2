//! Error types for scidpack.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for scidpack operations.
pub type Result<T> = std::result::Result<T, ScidpackError>;

/// Errors that can occur while converting a `.scid` file.
///
/// Every per-file variant maps onto a numeric return code (see
/// [`ScidpackError::code`]). [`ScidpackError::Holiday`] and
/// [`ScidpackError::InvalidSymbol`] are fatal to a run.
#[derive(Error, Debug)]
pub enum ScidpackError {
    /// The file name does not follow `{root}{month code}{yy}`.
    #[error("Malformed futures file name {name}: {reason}")]
    MalformedFuturesFileName {
        /// The offending file name.
        name: String,
        /// Why the name was rejected.
        #[source]
        reason: ContractNameError,
    },

    /// The binary stream was truncated or does not look like a `.scid` file.
    #[error("I/O error reading data: {0}")]
    IoErrorReadingData(String),

    /// The holiday calendar could not be loaded.
    #[error(transparent)]
    Holiday(#[from] HolidayError),

    /// The configured symbol root cannot name any contract.
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(#[source] ContractNameError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing or packaging the output failed.
    #[error("Format error: {0}")]
    Format(String),
}

impl ScidpackError {
    /// Return code recorded for a malformed file name.
    pub const MALFORMED_NAME_CODE: i32 = -1;
    /// Return code recorded for unreadable data.
    pub const IO_ERROR_CODE: i32 = -2;

    /// Returns the numeric return code of this error.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::MalformedFuturesFileName { .. } => Self::MALFORMED_NAME_CODE,
            _ => Self::IO_ERROR_CODE,
        }
    }

    /// Returns true if the error aborts the whole run rather than one file.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Holiday(_) | Self::InvalidSymbol(_))
    }
}

/// Reasons a contract file name is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractNameError {
    /// The name does not start with the configured symbol root.
    #[error("expected symbol root {expected}")]
    RootMismatch {
        /// The configured root.
        expected: String,
    },

    /// The symbol root is empty, too long, or not alphanumeric.
    #[error("invalid symbol root {0:?}")]
    InvalidRoot(String),

    /// Nothing follows the symbol root.
    #[error("missing month code")]
    MissingMonthCode,

    /// The month code is not one of the quarterly codes.
    #[error("unknown month code '{0}'")]
    UnknownMonthCode(char),

    /// The year is not exactly two ASCII digits.
    #[error("invalid two-digit year {0:?}")]
    InvalidYear(String),

    /// The contract's active window does not exist in the exchange timezone.
    #[error("active window {0} cannot be resolved in the exchange timezone")]
    UnresolvableWindow(String),
}

/// Errors raised while loading the holiday calendar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HolidayError {
    /// A line is not a `YYYY-MM-DD` date.
    #[error("Holiday file line {line}: cannot parse {text:?} as YYYY-MM-DD")]
    Unparseable {
        /// One-based line number.
        line: usize,
        /// The offending text.
        text: String,
    },

    /// A date is earlier than the one before it.
    #[error("Holiday file line {line}: {date} is out of order (follows {previous})")]
    OutOfOrder {
        /// One-based line number.
        line: usize,
        /// The out-of-order date.
        date: NaiveDate,
        /// The date on the preceding entry.
        previous: NaiveDate,
    },

    /// A date appears twice.
    #[error("Holiday file line {line}: duplicate holiday {date}")]
    Duplicate {
        /// One-based line number.
        line: usize,
        /// The repeated date.
        date: NaiveDate,
    },

    /// The holiday file could not be read.
    #[error("Cannot read holiday file: {0}")]
    Read(String),
}
