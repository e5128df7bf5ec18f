//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use gameforge_core::types::{FileId, GameId};

/// A path inside a game's namespace.
///
/// The file row carries no content. Its current content is whatever the
/// highest-numbered [`FileVersion`](super::FileVersion) holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GameFile {
    /// Unique file identifier.
    pub id: FileId,
    /// The owning game.
    pub game_id: GameId,
    /// Path within the game, unique per game.
    pub path: String,
    /// Free-form content kind, typically the extension.
    #[serde(rename = "type")]
    pub file_type: String,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file last gained a version.
    pub updated_at: DateTime<Utc>,
}

impl GameFile {
    /// The last path segment.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// A file together with its derived current content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FileWithContent {
    /// The file row.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub file: GameFile,
    /// Content of the latest version.
    pub content: String,
    /// Number of the latest version.
    pub current_version: i32,
}
