//! xlsxdataset CLI.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use xlsxdataset::logging::{init_logging, LogConfig};
use xlsxdataset::{ConverterBuilder, DatasetError, RunSummary};

#[derive(Parser)]
#[command(
    name = "xlsxdataset",
    version,
    about = "Convert per-rule Excel test datasets to dataset JSON documents",
    long_about = "Convert per-rule Excel test datasets to dataset JSON documents.\n\n\
                  For every rule folder under --rules, the first spreadsheet of each\n\
                  subfolder of the matching dataset folder is converted and written to\n\
                  json_datasets/<rule_id>/converted_dataset.json. Set RUST_LOG to\n\
                  change the log level."
)]
struct Cli {
    /// Directory whose immediate subdirectories are rule identifiers.
    #[arg(long, value_name = "PATH")]
    rules: PathBuf,

    /// Root of the dataset tree to search for rule folders.
    #[arg(long, value_name = "PATH")]
    datasets: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    let log_config = LogConfig::default().with_ansi(io::stderr().is_terminal());
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match run(&cli) {
        Ok(summary) => {
            report(&summary);
            0
        }
        Err(error) => {
            eprintln!("error: {error}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<RunSummary, DatasetError> {
    let converter = ConverterBuilder::new().build()?;
    converter.process_rules(&cli.rules, &cli.datasets)
}

/// 1ファイルの失敗では終了コードを変えず、集計をログに出す
fn report(summary: &RunSummary) {
    info!(
        converted = summary.converted.len(),
        failed = summary.failed.len(),
        skipped_rules = summary.skipped_rules.len(),
        "run finished"
    );
    if summary.has_failures() {
        warn!(
            failed = summary.failed.len(),
            "some spreadsheets could not be converted"
        );
    }
}
