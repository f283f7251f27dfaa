//! Parse command - run the field parser on already-recognized text.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use billscan_core::{InvoiceField, InvoiceParser, KeywordInvoiceParser};

use super::output::{format_records, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Text file with one recognized line per line
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,
}

pub async fn run(args: ParseArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Parsing {}", args.input.display());
    let text = fs::read_to_string(&args.input)?;
    let fields = KeywordInvoiceParser::new().parse(&text);

    match fields.clone().into_record() {
        Ok(record) => {
            println!("{}", format_records(&[record], args.format)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", style("Found fields:").yellow());
            for field in InvoiceField::ALL {
                eprintln!(
                    "  {}: {}",
                    field,
                    fields.get(field).unwrap_or("<absent>")
                );
            }
            anyhow::bail!("{}: {}", args.input.display(), e)
        }
    }
}
