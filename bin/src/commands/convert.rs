//! Convert command implementation.
//!
//! Converts every `<symbol>*.scid` file of the input directory in parallel,
//! with a progress bar over files.

use crate::display::{file_progress, format_elapsed};
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use scidpack_lib::prelude::*;
use std::process::ExitCode;

/// Execute the convert command.
pub(crate) async fn convert(config: &ConvertConfig, quiet: bool) -> Result<ExitCode> {
    let batch = Batch::prepare(config).with_context(|| {
        format!(
            "Cannot start conversion of {} into {}",
            config.input_dir.display(),
            config.output_dir.display()
        )
    })?;

    let total = batch.paths().len();
    if total == 0 && !quiet {
        println!(
            "No {}*.scid files found in {}",
            config.symbol,
            config.input_dir.display()
        );
    }

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        file_progress(total as u64)
    };

    let summary = batch
        .run(|path, outcome| {
            if let Some(name) = path.file_name() {
                progress.set_message(name.to_string_lossy().into_owned());
            }
            if outcome.is_failure() {
                progress.println(format!("  [{}] {}", outcome.code(), outcome.message(path)));
            }
            progress.inc(1);
        })
        .await;
    progress.finish_and_clear();

    if !quiet {
        println!("Conversion complete:");
        println!("  Succeeded: {}", summary.succeeded);
        println!("  Ignored:   {}", summary.ignored);
        println!("  Failed:    {}", summary.failed);
        println!("  Elapsed:   {}", format_elapsed(summary.elapsed));
        println!("  Log:       {}", config.log_path().display());
    }

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
