//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable holding the OCR service endpoint.
pub const ENDPOINT_VAR: &str = "AZURE_ENDPOINT";

/// Environment variable holding the OCR service access key.
pub const KEY_VAR: &str = "AZURE_KEY";

/// Default CSV output path.
pub const DEFAULT_CSV_PATH: &str = "invoice_data.csv";

/// Main configuration for billscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BillscanConfig {
    /// OCR service configuration.
    pub ocr: OcrConfig,

    /// Output configuration.
    pub output: OutputConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,
}

/// Largest file the Read API accepts (paid tiers).
pub const SERVICE_MAX_IMAGE_BYTES: usize = 500 * 1024 * 1024;

/// Cloud OCR client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Read API version used in request paths.
    pub api_version: String,

    /// Delay between two status polls, in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum number of status polls before giving up.
    pub max_poll_attempts: u32,

    /// Timeout for a single HTTP request, in seconds.
    pub request_timeout_secs: u64,

    /// Largest image submitted, in bytes. Larger files are rejected locally.
    ///
    /// Defaults to the Read API's own upper limit on paid tiers; the free tier
    /// accepts only 4 MB, so lower this to fail fast there.
    pub max_image_bytes: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_version: "v3.2".to_string(),
            poll_interval_ms: 1000,
            max_poll_attempts: 120,
            request_timeout_secs: 60,
            max_image_bytes: SERVICE_MAX_IMAGE_BYTES,
        }
    }
}

impl OcrConfig {
    /// Polling interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Result file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the CSV file, overwritten on every successful run.
    pub csv_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
        }
    }
}

/// Batch processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of images submitted to the OCR service at once.
    pub jobs: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { jobs: 1 }
    }
}

impl BillscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Credentials for the cloud OCR service.
#[derive(Clone)]
pub struct AzureCredentials {
    /// Service endpoint URL, e.g. `https://<resource>.cognitiveservices.azure.com/`.
    pub endpoint: String,

    /// Subscription key.
    pub key: String,
}

impl AzureCredentials {
    /// Create credentials from explicit values.
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            key: key.into(),
        }
    }

    /// Read credentials from `AZURE_ENDPOINT` and `AZURE_KEY`.
    ///
    /// Empty values are treated as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        let key = read(KEY_VAR)?;
        let endpoint = read(ENDPOINT_VAR)?;
        Ok(Self::new(endpoint, key))
    }
}

impl std::fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("endpoint", &self.endpoint)
            .field("key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_credentials_from_lookup() {
        let creds = AzureCredentials::from_lookup(lookup(&[
            (ENDPOINT_VAR, "https://example.cognitiveservices.azure.com/"),
            (KEY_VAR, "secret"),
        ]))
        .unwrap();

        assert_eq!(creds.endpoint, "https://example.cognitiveservices.azure.com/");
        assert_eq!(creds.key, "secret");
        assert!(!format!("{:?}", creds).contains("secret"));
    }

    #[test]
    fn test_missing_credentials() {
        let err = AzureCredentials::from_lookup(lookup(&[(KEY_VAR, "secret")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ENDPOINT_VAR)));

        let err = AzureCredentials::from_lookup(lookup(&[
            (ENDPOINT_VAR, "https://example.com"),
            (KEY_VAR, "  "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(KEY_VAR)));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: BillscanConfig =
            serde_json::from_str(r#"{"ocr": {"poll_interval_ms": 250}}"#).unwrap();

        assert_eq!(config.ocr.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.ocr.max_poll_attempts, 120);
        assert_eq!(config.output.csv_path, PathBuf::from(DEFAULT_CSV_PATH));
        assert_eq!(config.batch.jobs, 1);
        assert_eq!(config.ocr.max_image_bytes, SERVICE_MAX_IMAGE_BYTES);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = BillscanConfig::default();
        config.batch.jobs = 4;
        config.save(&path).unwrap();

        let loaded = BillscanConfig::from_file(&path).unwrap();
        assert_eq!(loaded.batch.jobs, 4);
        assert_eq!(loaded.ocr.api_version, "v3.2");
    }
}
