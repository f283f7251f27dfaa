//! Rendering of extracted records for the terminal.

use billscan_core::sink::header;
use billscan_core::InvoiceRecord;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    Table,
    /// JSON array
    Json,
}

pub fn format_records(records: &[InvoiceRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => Ok(format_table(records)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
    }
}

fn format_table(records: &[InvoiceRecord]) -> String {
    let columns = header();

    let mut widths = columns.map(|c| c.chars().count());
    for record in records {
        for (width, value) in widths.iter_mut().zip(record.values()) {
            *width = (*width).max(value.chars().count());
        }
    }

    let row = |cells: [&str; 3]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        padded.join(" | ").trim_end().to_string()
    };

    let mut output = String::new();
    output.push_str(&row(columns));
    output.push('\n');
    output.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    output.push('\n');

    for record in records {
        output.push_str(&row(record.values()));
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_layout() {
        let records = vec![InvoiceRecord::new("12345", "30 m3", "400 kWh")];

        assert_eq!(
            format_table(&records),
            "Account Number | Water Consumption | Electric Usage\n\
             ---------------+-------------------+---------------\n\
             12345          | 30 m3             | 400 kWh\n"
        );
    }

    #[test]
    fn test_json_uses_column_names() {
        let records = vec![InvoiceRecord::new("1", "2", "3")];
        let json = format_records(&records, OutputFormat::Json).unwrap();

        assert!(json.contains("\"Account Number\": \"1\""));
        assert!(json.contains("\"Electric Usage\": \"3\""));
    }
}
