//! Utility invoice data models.

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::invoice::InvoiceField;

/// Fields found in one image's text. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFields {
    /// Customer account number.
    pub account_number: Option<String>,

    /// Water consumption, kept verbatim (e.g. "30 m3").
    pub water_consumption: Option<String>,

    /// Electric usage, kept verbatim (e.g. "400 kWh").
    pub electric_usage: Option<String>,
}

impl ParsedFields {
    /// Get the value stored for a field.
    pub fn get(&self, field: InvoiceField) -> Option<&str> {
        match field {
            InvoiceField::AccountNumber => self.account_number.as_deref(),
            InvoiceField::WaterConsumption => self.water_consumption.as_deref(),
            InvoiceField::ElectricUsage => self.electric_usage.as_deref(),
        }
    }

    /// Store a value for a field, replacing any earlier one.
    pub fn set(&mut self, field: InvoiceField, value: impl Into<String>) {
        let slot = match field {
            InvoiceField::AccountNumber => &mut self.account_number,
            InvoiceField::WaterConsumption => &mut self.water_consumption,
            InvoiceField::ElectricUsage => &mut self.electric_usage,
        };
        *slot = Some(value.into());
    }

    /// Fields that are absent or empty, in column order.
    pub fn missing(&self) -> Vec<InvoiceField> {
        InvoiceField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none_or(str::is_empty))
            .collect()
    }

    /// Whether all three fields carry a non-empty value.
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Convert into a complete record, or report which fields are missing.
    pub fn into_record(self) -> Result<InvoiceRecord, ExtractionError> {
        let missing = self.missing();
        match (self.account_number, self.water_consumption, self.electric_usage) {
            (Some(account_number), Some(water_consumption), Some(electric_usage))
                if missing.is_empty() =>
            {
                Ok(InvoiceRecord {
                    account_number,
                    water_consumption,
                    electric_usage,
                })
            }
            _ => Err(ExtractionError::MissingFields(missing)),
        }
    }
}

/// A complete invoice row as written to the CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Customer account number.
    #[serde(rename = "Account Number")]
    pub account_number: String,

    /// Water consumption.
    #[serde(rename = "Water Consumption")]
    pub water_consumption: String,

    /// Electric usage.
    #[serde(rename = "Electric Usage")]
    pub electric_usage: String,
}

impl InvoiceRecord {
    /// Create a record from its three values.
    pub fn new(
        account_number: impl Into<String>,
        water_consumption: impl Into<String>,
        electric_usage: impl Into<String>,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            water_consumption: water_consumption.into(),
            electric_usage: electric_usage.into(),
        }
    }

    /// Values in column order.
    pub fn values(&self) -> [&str; 3] {
        [
            &self.account_number,
            &self.water_consumption,
            &self.electric_usage,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_complete_fields_convert_to_record() {
        let mut fields = ParsedFields::default();
        fields.set(InvoiceField::AccountNumber, "12345");
        fields.set(InvoiceField::WaterConsumption, "30 m3");
        fields.set(InvoiceField::ElectricUsage, "400 kWh");

        assert!(fields.is_complete());
        assert_eq!(
            fields.into_record(),
            Ok(InvoiceRecord::new("12345", "30 m3", "400 kWh"))
        );
    }

    #[test]
    fn test_missing_fields_listed_in_column_order() {
        let mut fields = ParsedFields::default();
        fields.set(InvoiceField::WaterConsumption, "30 m3");

        assert_eq!(
            fields.missing(),
            vec![InvoiceField::AccountNumber, InvoiceField::ElectricUsage]
        );
        assert_eq!(
            fields.into_record(),
            Err(ExtractionError::MissingFields(vec![
                InvoiceField::AccountNumber,
                InvoiceField::ElectricUsage,
            ]))
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut fields = ParsedFields::default();
        fields.set(InvoiceField::AccountNumber, "");
        fields.set(InvoiceField::WaterConsumption, "30 m3");
        fields.set(InvoiceField::ElectricUsage, "400 kWh");

        assert!(!fields.is_complete());
        assert_eq!(fields.missing(), vec![InvoiceField::AccountNumber]);
    }

    #[test]
    fn test_set_replaces_earlier_value() {
        let mut fields = ParsedFields::default();
        fields.set(InvoiceField::ElectricUsage, "100 kWh");
        fields.set(InvoiceField::ElectricUsage, "400 kWh");
        assert_eq!(fields.get(InvoiceField::ElectricUsage), Some("400 kWh"));
    }
}
