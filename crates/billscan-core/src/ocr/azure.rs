//! Azure Computer Vision Read API client.

use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::OcrError;
use crate::models::config::{AzureCredentials, OcrConfig};

use super::poll::{poll_until_done, PollPolicy};
use super::{ImageInput, OcrBackend, ReadOperationResult, ReadStatus};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "Operation-Location";

/// Identifier of a submitted read operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationId(String);

impl OperationId {
    /// Take the last path segment of an `Operation-Location` URL.
    pub fn from_location(location: &str) -> Option<Self> {
        location
            .trim()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .map(|id| Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error body returned by the service on failed requests.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: ServiceErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorDetail {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

fn service_error_message(body: &str, fallback: &str) -> String {
    match serde_json::from_str::<ServiceErrorBody>(body) {
        Ok(ServiceErrorBody {
            error: ServiceErrorDetail {
                code: Some(code),
                message,
            },
        }) => format!("{} ({})", message, code),
        Ok(parsed) => parsed.error.message,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => fallback.to_string(),
    }
}

/// Client for the asynchronous Read operation.
pub struct AzureReadClient {
    http: reqwest::Client,
    credentials: AzureCredentials,
    api_version: String,
    policy: PollPolicy,
    max_image_bytes: usize,
}

impl AzureReadClient {
    /// Build a client from credentials and OCR settings.
    pub fn new(credentials: AzureCredentials, config: &OcrConfig) -> Result<Self, OcrError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("billscan/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            credentials,
            api_version: config.api_version.clone(),
            policy: PollPolicy::from(config),
            max_image_bytes: config.max_image_bytes,
        })
    }

    /// Replace the polling policy.
    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn read_base_url(&self) -> String {
        format!(
            "{}/vision/{}/read",
            self.credentials.endpoint.trim_end_matches('/'),
            self.api_version
        )
    }

    /// URL that accepts image submissions.
    pub fn analyze_url(&self) -> String {
        format!("{}/analyze", self.read_base_url())
    }

    /// URL reporting the status of one operation.
    pub fn result_url(&self, operation_id: &OperationId) -> String {
        format!("{}/analyzeResults/{}", self.read_base_url(), operation_id)
    }

    /// Submit image bytes and return the operation to poll.
    pub async fn submit(&self, bytes: &[u8]) -> Result<OperationId, OcrError> {
        let response = self
            .http
            .post(self.analyze_url())
            .header(SUBSCRIPTION_KEY_HEADER, &self.credentials.key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await?;

        let response = check_status(response).await?;

        let location = response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(OcrError::MissingOperationLocation)?;

        OperationId::from_location(location).ok_or(OcrError::MissingOperationLocation)
    }

    /// Fetch the current status of an operation.
    pub async fn fetch_result(
        &self,
        operation_id: &OperationId,
    ) -> Result<ReadOperationResult, OcrError> {
        let response = self
            .http
            .get(self.result_url(operation_id))
            .header(SUBSCRIPTION_KEY_HEADER, &self.credentials.key)
            .send()
            .await?;

        let body = check_status(response).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| OcrError::InvalidResponse(e.to_string()))
    }
}

async fn check_status(response: Response) -> Result<Response, OcrError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(OcrError::Service {
        status: status.as_u16(),
        message: service_error_message(&body, status.canonical_reason().unwrap_or("error")),
    })
}

impl OcrBackend for AzureReadClient {
    async fn extract_text(&self, image: &ImageInput) -> Result<String, OcrError> {
        let info = image.preflight(self.max_image_bytes)?;
        debug!(
            "Submitting {} ({:?}, {}x{}, {} bytes)",
            image.name,
            info.format,
            info.width,
            info.height,
            image.bytes.len()
        );

        let operation_id = self.submit(&image.bytes).await?;
        info!("Read operation {} started for {}", operation_id, image.name);

        let client = self;
        let id = &operation_id;
        let result =
            poll_until_done(self.policy, id.as_str(), move || client.fetch_result(id)).await?;

        if result.status != ReadStatus::Succeeded {
            warn!(
                "Read operation {} for {} ended with status {:?}",
                operation_id, image.name, result.status
            );
            return Ok(String::new());
        }

        debug!(
            "Operation {} recognized {} lines",
            operation_id,
            result.line_count()
        );
        Ok(result.text())
    }
}
