//! Game entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use gameforge_core::types::GameId;

/// A project container owning a tree of files and their commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Unique game identifier.
    pub id: GameId,
    /// Display name (never empty).
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// When the game was created.
    pub created_at: DateTime<Utc>,
    /// Latest change to the game or any of its files.
    pub updated_at: DateTime<Utc>,
}
