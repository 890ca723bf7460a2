//! scidpack CLI - Sierra Chart `.scid` futures tick converter.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use scidpack_lib::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod display;

#[derive(Parser)]
#[command(name = "scidpack")]
#[command(about = "Convert Sierra Chart .scid futures tick files to per-second CSV", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Exchange timezone (IANA name)
    #[arg(long, global = true, default_value = "America/New_York", value_parser = display::parse_timezone)]
    timezone: Tz,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every matching .scid file in a directory
    Convert {
        /// Directory containing <symbol>*.scid files
        #[arg(short, long, default_value = ".")]
        input_dir: PathBuf,

        /// Directory receiving <contract>.zip archives and the run log
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Holiday calendar, one YYYY-MM-DD date per line in ascending order
        #[arg(long, default_value = ConvertConfig::DEFAULT_HOLIDAYS_FILE_NAME)]
        holidays: PathBuf,

        /// Futures symbol root
        #[arg(short, long, default_value = ConvertConfig::DEFAULT_SYMBOL)]
        symbol: String,

        /// Reconvert files whose archive already exists
        #[arg(long)]
        replace: bool,

        /// Maximum number of files converted at once [default: number of cores]
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Show the header and tick range of a .scid file
    Info {
        /// Path to the .scid file
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the active window of a contract (e.g. ESZ20)
    Window {
        /// Contract name: symbol root, month code, two-digit year
        contract: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    display::init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Convert {
            input_dir,
            output_dir,
            holidays,
            symbol,
            replace,
            jobs,
        } => {
            let mut config = ConvertConfig::new(input_dir, output_dir)
                .with_holidays(holidays)
                .with_symbol(symbol.to_ascii_uppercase())
                .with_update_only(!replace)
                .with_timezone(cli.timezone);
            if let Some(jobs) = jobs {
                config = config.with_jobs(jobs);
            }
            commands::convert::convert(&config, cli.quiet).await
        }
        Commands::Info { file, json } => {
            commands::info::show_info(&file, cli.timezone, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Window { contract } => {
            commands::window::show_window(&contract, cli.timezone)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
