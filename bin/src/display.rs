//! Display utilities and output formatting for the scidpack CLI.

use chrono::{DateTime, SecondsFormat};
use indicatif::{ProgressBar, ProgressStyle};
use scidpack_lib::Tz;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Installs the `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `-v` flags raise the level from
/// warn, and `-q` lowers it to error.
pub(crate) fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Parses an IANA timezone name.
pub(crate) fn parse_timezone(name: &str) -> Result<Tz, String> {
    name.parse::<Tz>()
        .map_err(|_| format!("unknown timezone: {name}"))
}

/// Creates the per-file progress bar.
pub(crate) fn file_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    match ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
    {
        Ok(style) => pb.set_style(style.progress_chars("=>-")),
        Err(e) => tracing::debug!(error = %e, "invalid progress template"),
    }
    pb
}

/// Formats a wall-clock duration as `1h 02m 03.456s`, dropping leading zero
/// units.
pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = (total % 60) as f64 + f64::from(elapsed.subsec_millis()) / 1000.0;

    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:06.3}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:06.3}s")
    } else {
        format!("{seconds:.3}s")
    }
}

/// Formats an exchange-local instant with microseconds and offset.
pub(crate) fn format_local(instant: &DateTime<Tz>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, false)
}
