//! Output abstractions.

use std::io::Write;
use std::path::PathBuf;

use scidpack_types::OutputRow;
use thiserror::Error;

/// Errors that can occur during formatting or packaging.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Zip archive error.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// Trait for row formatters.
pub trait Formatter: Send + Sync {
    /// Writes rows to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_rows<W: Write + Send>(&self, rows: &[OutputRow], writer: W)
    -> Result<(), FormatError>;

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}

/// Destination for a contract's converted rows.
///
/// Implementations must be safe to call from several workers at once; each
/// call handles a distinct `base_name`.
pub trait RowSink: Send + Sync {
    /// Returns the path of the artifact produced for `base_name`.
    fn artifact_path(&self, base_name: &str) -> PathBuf;

    /// Writes `rows` as the artifact for `base_name`, returning its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be written.
    fn finalize(&self, base_name: &str, rows: &[OutputRow]) -> Result<PathBuf, FormatError>;
}
