//! Invoice field extraction module.

mod labels;
mod parser;

pub use labels::{classify_line, value_after_colon, InvoiceField, LABEL_PRIORITY};
pub use parser::{InvoiceParser, KeywordInvoiceParser};
