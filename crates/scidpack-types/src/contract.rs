//! Futures contract naming.

use std::path::Path;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{ContractNameError, ContractWindow, ScidpackError};

/// Quarterly futures delivery month code.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonthCode {
    /// March delivery.
    #[display("H")]
    March,
    /// June delivery.
    #[display("M")]
    June,
    /// September delivery.
    #[display("U")]
    September,
    /// December delivery.
    #[display("Z")]
    December,
}

impl MonthCode {
    /// Looks up a month code by its letter (case-insensitive).
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'H' => Some(Self::March),
            'M' => Some(Self::June),
            'U' => Some(Self::September),
            'Z' => Some(Self::December),
            _ => None,
        }
    }

    /// Returns the letter for this code.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Self::March => 'H',
            Self::June => 'M',
            Self::September => 'U',
            Self::December => 'Z',
        }
    }

    /// Returns the calendar month (1-12) of delivery.
    #[must_use]
    pub const fn delivery_month(&self) -> u32 {
        match self {
            Self::March => 3,
            Self::June => 6,
            Self::September => 9,
            Self::December => 12,
        }
    }

    /// Returns all quarterly codes in calendar order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::March, Self::June, Self::September, Self::December]
    }
}

/// A parsed contract file name such as `ESZ20` or `ESZ20-CME`.
///
/// Grammar: `{root}{month code}{yy}` optionally followed by `-{exchange}`.
/// The root is 1-3 ASCII alphanumerics and the year is two digits, read as
/// `2000 + yy`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractName {
    root: String,
    code: MonthCode,
    year: i32,
}

impl ContractName {
    /// Maximum length of a symbol root.
    pub const MAX_ROOT_LEN: usize = 3;

    /// Creates a contract name from its parts.
    #[must_use]
    pub fn new(root: impl Into<String>, code: MonthCode, year: i32) -> Self {
        Self {
            root: root.into().to_ascii_uppercase(),
            code,
            year,
        }
    }

    /// Checks that `root` is 1 to [`Self::MAX_ROOT_LEN`] ASCII alphanumeric
    /// characters.
    ///
    /// # Errors
    ///
    /// Returns [`ContractNameError::InvalidRoot`] otherwise.
    pub fn validate_root(root: &str) -> Result<(), ContractNameError> {
        validate_root(root)
    }

    /// Parses a file stem, optionally requiring a specific symbol root.
    ///
    /// # Errors
    ///
    /// Returns an error if the stem does not follow the contract grammar or
    /// its root differs from `expected_root`.
    pub fn parse(stem: &str, expected_root: Option<&str>) -> Result<Self, ContractNameError> {
        let upper = stem.to_ascii_uppercase();
        let name = upper.split_once('-').map_or(upper.as_str(), |(name, _)| name);

        let (root, rest) = match expected_root {
            Some(expected) => {
                let expected = expected.to_ascii_uppercase();
                let rest = name
                    .strip_prefix(expected.as_str())
                    .ok_or_else(|| ContractNameError::RootMismatch {
                        expected: expected.clone(),
                    })?;
                (expected, rest)
            }
            None => {
                let split = name.len().saturating_sub(3);
                if !name.is_char_boundary(split) {
                    return Err(ContractNameError::InvalidRoot(name.to_string()));
                }
                (name[..split].to_string(), &name[split..])
            }
        };
        validate_root(&root)?;

        let mut chars = rest.chars();
        let letter = chars.next().ok_or(ContractNameError::MissingMonthCode)?;
        let code = MonthCode::from_char(letter).ok_or(ContractNameError::UnknownMonthCode(letter))?;

        let yy = chars.as_str();
        if yy.len() != 2 || !yy.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ContractNameError::InvalidYear(yy.to_string()));
        }
        let year = 2000 + yy.parse::<i32>().map_err(|_| ContractNameError::InvalidYear(yy.to_string()))?;

        Ok(Self { root, code, year })
    }

    /// Parses the stem of a `.scid` path.
    ///
    /// # Errors
    ///
    /// Returns [`ScidpackError::MalformedFuturesFileName`] if the stem is not
    /// a valid contract name.
    pub fn from_path(path: &Path, expected_root: Option<&str>) -> Result<Self, ScidpackError> {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();

        Self::parse(&stem, expected_root)
            .map_err(|reason| ScidpackError::MalformedFuturesFileName { name, reason })
    }

    /// Returns the symbol root.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns the delivery month code.
    #[must_use]
    pub const fn code(&self) -> MonthCode {
        self.code
    }

    /// Returns the four-digit contract year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the canonical base name used for output artifacts.
    #[must_use]
    pub fn base_name(&self) -> String {
        format!("{}{}{:02}", self.root, self.code, self.year.rem_euclid(100))
    }

    /// Returns the active window of this contract.
    #[must_use]
    pub const fn window(&self) -> ContractWindow {
        ContractWindow::for_contract(self.code, self.year)
    }
}

impl std::fmt::Display for ContractName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.base_name())
    }
}

impl std::str::FromStr for ContractName {
    type Err = ContractNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, None)
    }
}

fn validate_root(root: &str) -> Result<(), ContractNameError> {
    let valid = (1..=ContractName::MAX_ROOT_LEN).contains(&root.len())
        && root.bytes().all(|b| b.is_ascii_alphanumeric());
    if valid {
        Ok(())
    } else {
        Err(ContractNameError::InvalidRoot(root.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_code_lookup() {
        assert_eq!(MonthCode::from_char('H'), Some(MonthCode::March));
        assert_eq!(MonthCode::from_char('z'), Some(MonthCode::December));
        assert_eq!(MonthCode::from_char('X'), None);
        assert_eq!(MonthCode::September.to_string(), "U");
        assert_eq!(MonthCode::June.delivery_month(), 6);
    }

    #[test]
    fn test_parse_with_expected_root() {
        let name = ContractName::parse("ESZ20", Some("ES")).unwrap();
        assert_eq!(name.root(), "ES");
        assert_eq!(name.code(), MonthCode::December);
        assert_eq!(name.year(), 2020);
        assert_eq!(name.base_name(), "ESZ20");
    }

    #[test]
    fn test_parse_without_root() {
        let name: ContractName = "NQH21".parse().unwrap();
        assert_eq!(name.root(), "NQ");
        assert_eq!(name.code(), MonthCode::March);
        assert_eq!(name.year(), 2021);
    }

    #[test]
    fn test_parse_exchange_suffix() {
        let name = ContractName::parse("ESU19-CME", Some("es")).unwrap();
        assert_eq!(name.base_name(), "ESU19");
    }

    #[test]
    fn test_unknown_month_code() {
        let err = ContractName::parse("ESX20", Some("ES")).unwrap_err();
        assert_eq!(err, ContractNameError::UnknownMonthCode('X'));
    }

    #[test]
    fn test_root_mismatch() {
        let err = ContractName::parse("NQZ20", Some("ES")).unwrap_err();
        assert!(matches!(err, ContractNameError::RootMismatch { .. }));
    }

    #[test]
    fn test_invalid_year() {
        assert_eq!(
            ContractName::parse("ESZ2A", Some("ES")).unwrap_err(),
            ContractNameError::InvalidYear("2A".to_string())
        );
        assert_eq!(
            ContractName::parse("ESZ2", Some("ES")).unwrap_err(),
            ContractNameError::InvalidYear("2".to_string())
        );
        assert_eq!(
            ContractName::parse("ES", Some("ES")).unwrap_err(),
            ContractNameError::MissingMonthCode
        );
    }

    #[test]
    fn test_validate_root() {
        assert!(ContractName::validate_root("ES").is_ok());
        assert!(ContractName::validate_root("6E").is_ok());
        assert_eq!(
            ContractName::validate_root("ABCD"),
            Err(ContractNameError::InvalidRoot("ABCD".to_string()))
        );
        assert!(ContractName::validate_root("").is_err());
        assert!(ContractName::validate_root("E-").is_err());
    }

    #[test]
    fn test_root_too_long() {
        let err = ContractName::parse("ABCDZ20", None).unwrap_err();
        assert_eq!(err, ContractNameError::InvalidRoot("ABCD".to_string()));
    }

    #[test]
    fn test_from_path() {
        let name = ContractName::from_path(Path::new("/data/ESH21.scid"), Some("ES")).unwrap();
        assert_eq!(name.base_name(), "ESH21");

        let err = ContractName::from_path(Path::new("/data/ESX20.scid"), Some("ES")).unwrap_err();
        assert!(matches!(
            err,
            ScidpackError::MalformedFuturesFileName { ref name, .. } if name == "ESX20.scid"
        ));
    }
}
