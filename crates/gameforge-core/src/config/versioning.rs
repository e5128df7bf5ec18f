//! Version numbering and conflict-retry configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the versioning and commit engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersioningConfig {
    /// Extra attempts made after a version-numbering conflict.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base backoff between attempts, multiplied by the attempt number.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Largest accepted file content, in bytes.
    #[serde(default = "default_max_content_bytes")]
    pub max_content_bytes: usize,
}

impl VersioningConfig {
    /// Backoff to wait before the given (1-based) retry.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(u64::from(attempt)))
    }
}

impl Default for VersioningConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            max_content_bytes: default_max_content_bytes(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    25
}

fn default_max_content_bytes() -> usize {
    5 * 1024 * 1024
}
