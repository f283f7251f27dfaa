//! Data models and configuration.

pub mod config;
pub mod invoice;

pub use config::{AzureCredentials, BillscanConfig, OcrConfig};
pub use invoice::{InvoiceRecord, ParsedFields};
