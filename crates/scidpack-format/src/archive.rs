//! Zip packaging of formatted output.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use scidpack_types::OutputRow;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::{CsvFormatter, FormatError, Formatter, RowSink};

/// Extension of packaged artifacts.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Reads the entry named `entry` out of the zip archive at `path`.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened, is not a valid zip file,
/// or has no such entry.
pub fn read_entry(path: &Path, entry: &str) -> Result<Vec<u8>, FormatError> {
    let mut archive = ZipArchive::new(BufReader::new(File::open(path)?))?;
    let mut file = archive.by_name(entry)?;

    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

/// Writes each contract's rows as `{base}.zip` holding one `{base}.{ext}`
/// entry, deflate-compressed.
///
/// Artifacts are first written to a `.part` file and renamed into place, so a
/// failed conversion never leaves a complete-looking artifact behind.
#[derive(Debug, Clone)]
pub struct ArchiveSink<F = CsvFormatter> {
    output_dir: PathBuf,
    formatter: F,
}

impl ArchiveSink<CsvFormatter> {
    /// Creates a sink writing default CSV into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::with_formatter(output_dir, CsvFormatter::new())
    }
}

impl<F: Formatter> ArchiveSink<F> {
    /// Creates a sink using a custom formatter.
    #[must_use]
    pub fn with_formatter(output_dir: impl Into<PathBuf>, formatter: F) -> Self {
        Self {
            output_dir: output_dir.into(),
            formatter,
        }
    }

    /// Returns the output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the name of the entry stored in the archive for `base_name`.
    #[must_use]
    pub fn entry_name(&self, base_name: &str) -> String {
        format!("{base_name}.{}", self.formatter.extension())
    }

    fn write_partial(
        &self,
        partial: &Path,
        base_name: &str,
        rows: &[OutputRow],
    ) -> Result<(), FormatError> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut zip = ZipWriter::new(BufWriter::new(File::create(partial)?));
        zip.start_file(self.entry_name(base_name), options)?;
        self.formatter.write_rows(rows, &mut zip)?;

        let mut writer = zip.finish()?;
        writer.flush()?;
        Ok(())
    }
}

impl<F: Formatter> RowSink for ArchiveSink<F> {
    fn artifact_path(&self, base_name: &str) -> PathBuf {
        self.output_dir.join(format!("{base_name}.{ARCHIVE_EXTENSION}"))
    }

    fn finalize(&self, base_name: &str, rows: &[OutputRow]) -> Result<PathBuf, FormatError> {
        let path = self.artifact_path(base_name);
        let partial = path.with_extension(format!("{ARCHIVE_EXTENSION}.part"));

        if let Err(e) = self.write_partial(&partial, base_name, rows) {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }
        fs::rename(&partial, &path)?;

        tracing::debug!(artifact = %path.display(), rows = rows.len(), "wrote archive");
        Ok(path)
    }
}
