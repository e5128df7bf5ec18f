//! File version entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use gameforge_core::types::{FileId, FileVersionId};

/// An immutable snapshot of a file's full content.
///
/// For any file the `version` values form the contiguous range `1..=N`.
/// Numbers are assigned by the store, never by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FileVersion {
    /// Unique version identifier.
    pub id: FileVersionId,
    /// The file this version belongs to.
    pub file_id: FileId,
    /// Full content at this version.
    pub content: String,
    /// Sequential, 1-based version number.
    pub version: i32,
    /// Optional description of the change.
    pub commit_message: Option<String>,
    /// When this version was created.
    pub created_at: DateTime<Utc>,
    /// Optional attribution (user, agent, tool).
    pub created_by: Option<String>,
    /// Opaque structured annotation.
    pub metadata: Option<serde_json::Value>,
}

impl FileVersion {
    /// Whether this is the first version of its file.
    pub fn is_initial(&self) -> bool {
        self.version == 1
    }
}
