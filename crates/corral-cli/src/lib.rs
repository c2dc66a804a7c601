//! CLI logic for the Corral scenario runner.
//!
//! A scenario file describes a canvas of nested nodes and a sequence of
//! pointer interactions. The runner replays the interactions against a
//! headless [`corral::ScopeEngine`] and reports the final layout together
//! with the scope events emitted along the way.

pub mod error_adapter;
pub mod scenario;

mod args;
mod config;
mod error;
mod runner;

pub use args::Args;
pub use config::{ConfigError, load_config};
pub use error::CliError;
pub use runner::{Report, simulate};

use std::{fs, io::Write};

use log::info;

use scenario::Scenario;

/// Run the Corral CLI application
///
/// This function loads the configuration and the scenario, replays the
/// scenario and writes the report to the output file, or to stdout when no
/// output path is given.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Scenario parsing errors
/// - Scenario steps rejected by the engine
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(input_path = args.input; "Running scenario");

    let config = load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let scenario =
        Scenario::parse(&source).map_err(|err| CliError::scenario(&args.input, &source, &err))?;

    let report = simulate(&scenario, &config)?;

    match &args.output {
        Some(output) => {
            fs::write(output, report.to_string())?;
            info!(output_file = output.as_str(); "Report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            write!(stdout, "{report}")?;
        }
    }

    Ok(())
}
