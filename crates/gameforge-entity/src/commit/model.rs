//! Commit entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use gameforge_core::types::{CommitFileId, CommitId, FileVersionId, GameId};

use crate::file::FileVersion;

/// An atomic, named checkpoint over one or more file versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    /// Unique commit identifier.
    pub id: CommitId,
    /// The owning game.
    pub game_id: GameId,
    /// Commit message (never empty).
    pub message: String,
    /// When the commit was created.
    pub created_at: DateTime<Utc>,
    /// Optional attribution.
    pub created_by: Option<String>,
}

/// Link between a commit and a version it created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommitFile {
    /// Unique link identifier.
    pub id: CommitFileId,
    /// The commit.
    pub commit_id: CommitId,
    /// The version created by the commit.
    pub file_version_id: FileVersionId,
}

/// A version created by a commit, with its owning file's path and type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommitMember {
    /// The version row.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub version: FileVersion,
    /// Path of the owning file.
    pub path: String,
    /// Type of the owning file.
    #[serde(rename = "type")]
    pub file_type: String,
}

/// A commit together with everything it changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitDetail {
    /// The commit row.
    #[serde(flatten)]
    pub commit: Commit,
    /// Versions created by the commit, ordered by path.
    pub files: Vec<CommitMember>,
}
