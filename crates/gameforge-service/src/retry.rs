//! Bounded retry for version-numbering conflicts.

use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

use gameforge_core::config::VersioningConfig;
use gameforge_core::error::{AppError, ErrorKind};
use gameforge_core::result::AppResult;

/// How often a conflicting write is re-attempted before giving up.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    max_retries: u32,
    /// Base backoff, multiplied by the attempt number.
    backoff: Duration,
}

impl RetryPolicy {
    /// Creates a policy.
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Creates a policy from the versioning configuration.
    pub fn from_config(config: &VersioningConfig) -> Self {
        Self::new(config.max_retries, config.backoff_for(1))
    }

    /// Runs `attempt` until it succeeds, fails with a non-retryable error,
    /// or exhausts the retry budget.
    ///
    /// Each call to `attempt` must open its own transaction so a failed
    /// attempt leaves nothing behind. Exhausted conflicts surface as
    /// [`ErrorKind::Storage`].
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut attempt: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut retries = 0u32;
        loop {
            match attempt().await {
                Err(err) if err.is_retryable() => {
                    if retries >= self.max_retries {
                        error!(
                            operation,
                            attempts = retries + 1,
                            error = %err,
                            "Giving up after repeated version conflicts"
                        );
                        return Err(AppError::with_source(
                            ErrorKind::Storage,
                            format!("{operation} gave up after {} attempts", retries + 1),
                            err,
                        ));
                    }
                    retries += 1;
                    warn!(operation, retry = retries, error = %err, "Version conflict, retrying");
                    tokio::time::sleep(self.backoff * retries).await;
                }
                other => return other,
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&VersioningConfig::default())
    }
}
