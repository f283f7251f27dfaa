//! Error types for the billscan-core library.

use thiserror::Error;

use crate::invoice::InvoiceField;

/// Main error type for the billscan library.
#[derive(Error, Debug)]
pub enum BillscanError {
    /// OCR service error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Invoice field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// CSV output error.
    #[error("output error: {0}")]
    Sink(#[from] SinkError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the cloud OCR service.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with an error status.
    #[error("service returned {status}: {message}")]
    Service { status: u16, message: String },

    /// The submit response carried no usable `Operation-Location` header.
    #[error("missing Operation-Location header in response")]
    MissingOperationLocation,

    /// The service response could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The read operation did not finish within the polling budget.
    #[error("read operation {operation_id} did not finish after {attempts} polls")]
    TimedOut { operation_id: String, attempts: u32 },

    /// The image was rejected before submission.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to invoice field extraction.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    /// One or more required fields were not found.
    #[error("missing required fields: {}", format_fields(.0))]
    MissingFields(Vec<InvoiceField>),

    /// No image in the batch produced a complete record.
    #[error("no data extracted from the uploaded images")]
    NoData,
}

fn format_fields(fields: &[InvoiceField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors related to writing or reading the CSV result file.
#[derive(Error, Debug)]
pub enum SinkError {
    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row does not match the expected columns.
    #[error("unexpected header: {0}")]
    Header(String),

    /// I/O error while flushing the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to configuration and credentials.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    /// The configuration file could not be parsed.
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O error when reading or writing the configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the billscan library.
pub type Result<T> = std::result::Result<T, BillscanError>;
