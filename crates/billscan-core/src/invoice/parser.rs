//! Keyword-based invoice parser.

use tracing::{debug, trace};

use crate::models::invoice::ParsedFields;

use super::labels::{classify_line, value_after_colon};

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse invoice fields from recognized text.
    fn parse(&self, text: &str) -> ParsedFields;
}

/// Scans text line by line for the fixed field labels.
///
/// Each line is claimed by at most one field (see [`super::LABEL_PRIORITY`]).
/// When several lines carry the same label, the last one wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordInvoiceParser;

impl KeywordInvoiceParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }
}

impl InvoiceParser for KeywordInvoiceParser {
    fn parse(&self, text: &str) -> ParsedFields {
        let mut fields = ParsedFields::default();

        for (number, line) in text.lines().enumerate() {
            if let Some(field) = classify_line(line) {
                let value = value_after_colon(line);
                trace!("line {}: {} = {:?}", number + 1, field, value);
                fields.set(field, value);
            }
        }

        debug!("Parsed fields, missing: {:?}", fields.missing());
        fields
    }
}
