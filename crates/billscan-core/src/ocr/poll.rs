//! Bounded polling of asynchronous read operations.

use std::future::Future;
use std::time::Duration;

use tracing::trace;

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::ReadOperationResult;

/// How often and how long to poll an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two polls.
    pub interval: Duration,
    /// Maximum number of polls. Zero is treated as one.
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from(&OcrConfig::default())
    }
}

impl From<&OcrConfig> for PollPolicy {
    fn from(config: &OcrConfig) -> Self {
        Self::new(config.poll_interval(), config.max_poll_attempts)
    }
}

/// Poll `fetch` until the operation leaves `notStarted`/`running`.
///
/// The first poll happens immediately; later ones wait `policy.interval`.
/// Errors from `fetch` end polling at once.
pub async fn poll_until_done<F, Fut>(
    policy: PollPolicy,
    operation_id: &str,
    mut fetch: F,
) -> Result<ReadOperationResult, OcrError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ReadOperationResult, OcrError>>,
{
    let attempts = policy.max_attempts.max(1);

    for attempt in 1..=attempts {
        let result = fetch().await?;
        if !result.status.is_pending() {
            trace!(
                "Operation {} finished with {:?} after {} polls",
                operation_id, result.status, attempt
            );
            return Ok(result);
        }

        trace!("Operation {} is {:?} (poll {})", operation_id, result.status, attempt);
        if attempt < attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Err(OcrError::TimedOut {
        operation_id: operation_id.to_string(),
        attempts,
    })
}
