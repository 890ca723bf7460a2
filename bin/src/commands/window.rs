//! Window command implementation.

use anyhow::{Context, Result};
use scidpack_lib::ActiveWindow;
use scidpack_lib::prelude::*;

use crate::display::format_local;

/// Show the active window of a contract in the exchange timezone.
pub(crate) fn show_window(contract: &str, timezone: Tz) -> Result<()> {
    let name: ContractName = contract
        .parse()
        .with_context(|| format!("Malformed contract name: {contract}"))?;
    let window = name.window();
    let bounds = ActiveWindow::resolve(&window, &timezone)
        .with_context(|| format!("Window {window} does not exist in {timezone}"))?;

    println!("Contract: {name}");
    println!("Delivery: {}-{:02}", name.year(), name.code().delivery_month());
    println!("Start:    {} (inclusive)", format_local(bounds.start()));
    println!("End:      {} (exclusive)", format_local(bounds.end()));
    println!("Months:   {}", window.months_wide());

    Ok(())
}
