//! Show command - print a previously written result file.

use std::path::PathBuf;

use clap::Args;
use console::style;

use billscan_core::CsvSink;

use super::config::load_config;
use super::output::{format_records, OutputFormat};

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// CSV file to show (default: configured output file)
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,
}

pub async fn run(args: ShowArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = match args.input {
        Some(path) => path,
        None => load_config(config_path)?.output.csv_path,
    };

    if !path.exists() {
        anyhow::bail!("Result file not found: {}", path.display());
    }

    let records = CsvSink::new(&path).read()?;
    println!(
        "{} {} records in {}",
        style("ℹ").blue(),
        records.len(),
        path.display()
    );
    println!("{}", format_records(&records, args.format)?);

    Ok(())
}
