//! Core library for utility invoice OCR processing.
//!
//! This crate provides:
//! - Text extraction through the Azure Computer Vision Read API
//! - Keyword-based extraction of account number, water consumption and electric usage
//! - Batch orchestration preserving upload order
//! - CSV output of complete records

pub mod error;
pub mod invoice;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod sink;

pub use error::{BillscanError, Result};
pub use invoice::{InvoiceField, InvoiceParser, KeywordInvoiceParser};
pub use models::config::{AzureCredentials, BillscanConfig};
pub use models::invoice::{InvoiceRecord, ParsedFields};
pub use ocr::{AzureReadClient, ImageInput, OcrBackend};
pub use pipeline::{BatchReport, ImageOutcome, Pipeline};
pub use sink::CsvSink;
