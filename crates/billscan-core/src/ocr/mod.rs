//! Text extraction through a cloud OCR service.

mod azure;
mod input;
mod poll;

pub use azure::{AzureReadClient, OperationId};
pub use input::{is_supported_image, ImageInfo, ImageInput, SUPPORTED_EXTENSIONS};
pub use poll::{poll_until_done, PollPolicy};

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// A source of recognized text for invoice images.
///
/// The pipeline only needs this one capability, so tests can substitute a fake
/// backend for the cloud service.
pub trait OcrBackend {
    /// Recognize the text of one image.
    ///
    /// Returns the recognized lines joined with newlines. A job that finished
    /// without success yields an empty string rather than an error.
    fn extract_text(
        &self,
        image: &ImageInput,
    ) -> impl Future<Output = Result<String, OcrError>> + Send;
}

/// Status of an asynchronous read operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl ReadStatus {
    /// Whether the operation has not reached a terminal status yet.
    pub fn is_pending(self) -> bool {
        matches!(self, ReadStatus::NotStarted | ReadStatus::Running)
    }
}

/// Body of a read operation status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadOperationResult {
    /// Current operation status.
    pub status: ReadStatus,

    /// Recognition output, present once the operation succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyze_result: Option<AnalyzeResult>,
}

/// Recognition output of a read operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    /// One entry per page or image region.
    #[serde(default)]
    pub read_results: Vec<ReadResult>,
}

/// Text recognized on one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadResult {
    /// Page number, starting at 1.
    #[serde(default)]
    pub page: u32,

    /// Recognized lines in service order.
    #[serde(default)]
    pub lines: Vec<ReadLine>,
}

/// A single recognized line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadLine {
    /// Recognized text content.
    pub text: String,
}

impl ReadOperationResult {
    /// Total number of recognized lines.
    pub fn line_count(&self) -> usize {
        self.analyze_result
            .iter()
            .flat_map(|r| &r.read_results)
            .map(|page| page.lines.len())
            .sum()
    }

    /// Full text of a succeeded operation, one line per recognized line.
    ///
    /// Any other status yields an empty string.
    pub fn text(&self) -> String {
        if self.status != ReadStatus::Succeeded {
            return String::new();
        }

        let mut text = String::new();
        for page in self.analyze_result.iter().flat_map(|r| &r.read_results) {
            for line in &page.lines {
                text.push_str(&line.text);
                text.push('\n');
            }
        }

        text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SUCCEEDED: &str = r#"{
        "status": "succeeded",
        "createdDateTime": "2024-03-01T10:00:00Z",
        "lastUpdatedDateTime": "2024-03-01T10:00:02Z",
        "analyzeResult": {
            "version": "3.2.0",
            "readResults": [
                {
                    "page": 1,
                    "angle": 0.0,
                    "width": 1200,
                    "height": 1600,
                    "unit": "pixel",
                    "lines": [
                        {"boundingBox": [0,0,1,0,1,1,0,1], "text": "Account Number: 12345", "words": []},
                        {"boundingBox": [0,0,1,0,1,1,0,1], "text": "Water Consumption: 30 m3", "words": []}
                    ]
                },
                {
                    "page": 2,
                    "lines": [
                        {"text": "Electric Usage: 400 kWh"}
                    ]
                }
            ]
        }
    }"#;

    #[test]
    fn test_succeeded_result_text() {
        let result: ReadOperationResult = serde_json::from_str(SUCCEEDED).unwrap();

        assert_eq!(result.status, ReadStatus::Succeeded);
        assert_eq!(result.line_count(), 3);
        assert_eq!(
            result.text(),
            "Account Number: 12345\nWater Consumption: 30 m3\nElectric Usage: 400 kWh"
        );
    }

    #[test]
    fn test_pending_statuses() {
        let running: ReadOperationResult =
            serde_json::from_str(r#"{"status": "running"}"#).unwrap();
        let not_started: ReadOperationResult =
            serde_json::from_str(r#"{"status": "notStarted"}"#).unwrap();

        assert!(running.status.is_pending());
        assert!(not_started.status.is_pending());
        assert_eq!(running.text(), "");
    }

    #[test]
    fn test_failed_and_unknown_statuses_yield_no_text() {
        let failed: ReadOperationResult =
            serde_json::from_str(r#"{"status": "failed", "analyzeResult": {"readResults": []}}"#)
                .unwrap();
        let unknown: ReadOperationResult =
            serde_json::from_str(r#"{"status": "cancelled"}"#).unwrap();

        assert!(!failed.status.is_pending());
        assert_eq!(failed.text(), "");
        assert_eq!(unknown.status, ReadStatus::Unknown);
        assert!(!unknown.status.is_pending());
    }

    #[test]
    fn test_text_is_trimmed() {
        let result: ReadOperationResult = serde_json::from_str(
            r#"{"status": "succeeded", "analyzeResult": {"readResults": [
                {"page": 1, "lines": [{"text": "  "}, {"text": "Electric Usage: 1 "}]}
            ]}}"#,
        )
        .unwrap();

        assert_eq!(result.text(), "Electric Usage: 1");
    }
}
