//! Extract command - run OCR over invoice images and save the results to CSV.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use billscan_core::error::ExtractionError;
use billscan_core::ocr::is_supported_image;
use billscan_core::{
    AzureCredentials, AzureReadClient, BillscanError, CsvSink, ImageInput, ImageOutcome, Pipeline,
};

use super::config::load_config;
use super::output::{format_records, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Image files or glob patterns (jpg, png, jpeg)
    inputs: Vec<String>,

    /// CSV output file (default: invoice_data.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of images sent to the OCR service at once
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Format of the extracted data printed after saving
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Credentials are checked before touching any input
    let credentials = AzureCredentials::from_env().map_err(|e| {
        anyhow::anyhow!(
            "Azure credentials are not set in the environment variables ({})",
            e
        )
    })?;

    let images = collect_images(&args.inputs);
    println!(
        "{} Found {} images to process",
        style("ℹ").blue(),
        images.len()
    );

    let client = AzureReadClient::new(credentials, &config.ocr)?;
    let jobs = args.jobs.unwrap_or(config.batch.jobs);
    let pipeline = Pipeline::new(client).with_jobs(jobs);

    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images")?
            .progress_chars("=>-"),
    );

    let report = pipeline
        .run(images, |outcome| {
            report_outcome(&pb, outcome);
            pb.inc(1);
        })
        .await;

    pb.finish_and_clear();

    let sink = CsvSink::new(args.output.unwrap_or(config.output.csv_path));
    match report.save(&sink) {
        Err(BillscanError::Extraction(ExtractionError::NoData)) => {
            anyhow::bail!("No data extracted from the uploaded images.")
        }
        result => result?,
    }

    println!(
        "{} Data extracted and saved to {} successfully!",
        style("✓").green(),
        sink.path().display()
    );
    println!(
        "   {} saved, {} skipped in {:?}",
        style(report.records.len()).green(),
        style(report.failed().count()).red(),
        start.elapsed()
    );
    println!();
    println!("Extracted Data:");
    println!("{}", format_records(&report.records, args.format)?);

    Ok(())
}

/// Expand inputs into images in command-line order.
///
/// Unreadable files and files with other extensions are skipped with a warning.
fn collect_images(inputs: &[String]) -> Vec<ImageInput> {
    let mut images = Vec::new();

    for input in inputs {
        let paths: Vec<PathBuf> = match glob(input) {
            Ok(paths) => paths.filter_map(|r| r.ok()).collect(),
            Err(e) => {
                warn!("Invalid pattern {}: {}", input, e);
                Vec::new()
            }
        };

        if paths.is_empty() {
            eprintln!("{} No files match {}", style("⚠").yellow(), input);
            continue;
        }

        for path in paths {
            if !is_supported_image(&path) {
                eprintln!(
                    "{} Skipping {}: only jpg, png and jpeg images are accepted",
                    style("⚠").yellow(),
                    path.display()
                );
                continue;
            }

            match ImageInput::from_path(&path) {
                Ok(image) => {
                    debug!("Loaded {} ({} bytes)", path.display(), image.bytes.len());
                    images.push(image);
                }
                Err(e) => {
                    eprintln!(
                        "{} Could not read {}: {}",
                        style("✗").red(),
                        path.display(),
                        e
                    );
                }
            }
        }
    }

    images
}

fn report_outcome(pb: &ProgressBar, outcome: &ImageOutcome) {
    pb.suspend(|| {
        if let Some(error) = &outcome.ocr_error {
            eprintln!(
                "{} Computer Vision OCR error for {}: {}",
                style("✗").red(),
                outcome.name,
                error
            );
        }

        if !outcome.is_complete() {
            let missing: Vec<_> = outcome.missing().iter().map(|f| f.label()).collect();
            eprintln!(
                "{} Failed to extract all required data from the image: {} (missing {})",
                style("⚠").yellow(),
                outcome.name,
                missing.join(", ")
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_images_filters_extensions_and_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.JPG", "notes.txt", "c.jpeg"] {
            std::fs::write(dir.path().join(name), b"bytes").unwrap();
        }

        let inputs = vec![
            dir.path().join("c.jpeg").display().to_string(),
            dir.path().join("*.png").display().to_string(),
            dir.path().join("notes.txt").display().to_string(),
            dir.path().join("a.JPG").display().to_string(),
            dir.path().join("missing.png").display().to_string(),
        ];

        let names: Vec<_> = collect_images(&inputs)
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["c.jpeg", "b.png", "a.JPG"]);
    }
}
