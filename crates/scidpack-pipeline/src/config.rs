//! Run configuration.

use std::path::{Path, PathBuf};

use scidpack_calendar::{TimeConverter, Tz};

/// Configuration for a conversion run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Directory scanned for `.scid` files.
    pub input_dir: PathBuf,
    /// Directory receiving artifacts and the run log.
    pub output_dir: PathBuf,
    /// Holiday calendar file.
    pub holidays: PathBuf,
    /// Symbol root files must start with.
    pub symbol: String,
    /// Skip files whose artifact already exists.
    pub update_only: bool,
    /// Maximum number of files converted at once.
    pub jobs: usize,
    /// Exchange timezone.
    pub timezone: Tz,
    /// Name of the run log inside `output_dir`.
    pub log_file_name: String,
}

impl ConvertConfig {
    /// Default symbol root.
    pub const DEFAULT_SYMBOL: &'static str = "ES";
    /// Default run log name.
    pub const DEFAULT_LOG_FILE_NAME: &'static str = "scidpack.log";
    /// Default holiday file name.
    pub const DEFAULT_HOLIDAYS_FILE_NAME: &'static str = "holidays.txt";

    /// Creates a configuration reading from `input_dir` and writing to
    /// `output_dir`, with defaults for everything else.
    #[must_use]
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Sets the holiday calendar file.
    #[must_use]
    pub fn with_holidays(mut self, path: impl Into<PathBuf>) -> Self {
        self.holidays = path.into();
        self
    }

    /// Sets the symbol root.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Sets whether existing artifacts are kept.
    #[must_use]
    pub fn with_update_only(mut self, update_only: bool) -> Self {
        self.update_only = update_only;
        self
    }

    /// Sets the worker count. Zero is treated as one.
    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Sets the exchange timezone.
    #[must_use]
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Returns the path of the run log.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join(&self.log_file_name)
    }

    /// Returns the holiday file path.
    #[must_use]
    pub fn holidays_path(&self) -> &Path {
        &self.holidays
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            holidays: PathBuf::from(Self::DEFAULT_HOLIDAYS_FILE_NAME),
            symbol: Self::DEFAULT_SYMBOL.to_string(),
            update_only: true,
            jobs: default_jobs(),
            timezone: TimeConverter::DEFAULT_TIMEZONE,
            log_file_name: Self::DEFAULT_LOG_FILE_NAME.to_string(),
        }
    }
}

/// Returns the number of available cores, or one if unknown.
#[must_use]
pub fn default_jobs() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConvertConfig::default();
        assert_eq!(config.symbol, "ES");
        assert!(config.update_only);
        assert!(config.jobs >= 1);
        assert_eq!(config.timezone, new_york());
        assert_eq!(config.log_path(), PathBuf::from("./scidpack.log"));
    }

    #[test]
    fn test_builder() {
        let config = ConvertConfig::new("/in", "/out")
            .with_symbol("NQ")
            .with_update_only(false)
            .with_jobs(0)
            .with_holidays("/etc/holidays.txt");

        assert_eq!(config.input_dir, PathBuf::from("/in"));
        assert_eq!(config.symbol, "NQ");
        assert!(!config.update_only);
        assert_eq!(config.jobs, 1);
        assert_eq!(config.holidays_path(), Path::new("/etc/holidays.txt"));
        assert_eq!(config.log_path(), PathBuf::from("/out/scidpack.log"));
    }

    fn new_york() -> Tz {
        "America/New_York".parse().unwrap()
    }
}
