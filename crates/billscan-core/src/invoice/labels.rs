//! Label substrings identifying invoice fields in recognized text.

use serde::{Deserialize, Serialize};

/// One of the three fields read from a utility invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceField {
    /// Customer account number.
    AccountNumber,
    /// Water consumption.
    WaterConsumption,
    /// Electric usage.
    ElectricUsage,
}

impl InvoiceField {
    /// All fields, in CSV column order.
    pub const ALL: [InvoiceField; 3] = [
        InvoiceField::AccountNumber,
        InvoiceField::WaterConsumption,
        InvoiceField::ElectricUsage,
    ];

    /// Label substring searched for on each line. Also used as the CSV column name.
    pub fn label(self) -> &'static str {
        match self {
            InvoiceField::AccountNumber => "Account Number",
            InvoiceField::WaterConsumption => "Water Consumption",
            InvoiceField::ElectricUsage => "Electric Usage",
        }
    }
}

impl std::fmt::Display for InvoiceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Labels in priority order. The first label contained in a line claims it.
pub const LABEL_PRIORITY: [InvoiceField; 3] = InvoiceField::ALL;

/// Classify a line by the first label it contains.
pub fn classify_line(line: &str) -> Option<InvoiceField> {
    LABEL_PRIORITY
        .into_iter()
        .find(|field| line.contains(field.label()))
}

/// Value of a labelled line: text after the last colon, trimmed.
///
/// A line without a colon yields the whole trimmed line.
pub fn value_after_colon(line: &str) -> &str {
    line.rsplit(':').next().unwrap_or(line).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_line() {
        assert_eq!(
            classify_line("Account Number: 12345"),
            Some(InvoiceField::AccountNumber)
        );
        assert_eq!(
            classify_line("Total Electric Usage this period: 400 kWh"),
            Some(InvoiceField::ElectricUsage)
        );
        assert_eq!(classify_line("Amount due: 42.00"), None);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(classify_line("ACCOUNT NUMBER: 12345"), None);
        assert_eq!(classify_line("account number: 12345"), None);
    }

    #[test]
    fn test_first_label_wins() {
        assert_eq!(
            classify_line("Account Number / Electric Usage: 7"),
            Some(InvoiceField::AccountNumber)
        );
        assert_eq!(
            classify_line("Electric Usage and Water Consumption: 9"),
            Some(InvoiceField::WaterConsumption)
        );
    }

    #[test]
    fn test_value_after_last_colon() {
        assert_eq!(value_after_colon("Account Number:   12345  "), "12345");
        assert_eq!(value_after_colon("Read at 10:30 Electric Usage: 400 kWh"), "400 kWh");
        assert_eq!(value_after_colon("Electric Usage:"), "");
    }

    #[test]
    fn test_value_without_colon_is_whole_line() {
        assert_eq!(
            value_after_colon("  Water Consumption 30 m3 "),
            "Water Consumption 30 m3"
        );
    }
}
