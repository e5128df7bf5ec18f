//! Game repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use gameforge_core::result::AppResult;
use gameforge_core::types::{FileId, GameId};
use gameforge_entity::game::Game;

use crate::error::classify;

/// Game columns with `updated_at` folded over the game's files, so the
/// reported value reflects the latest file mutation without writers ever
/// touching the game row.
const SELECT_GAME: &str = "SELECT g.id, g.name, g.description, g.created_at, \
     GREATEST(g.updated_at, COALESCE((SELECT MAX(f.updated_at) FROM files f WHERE f.game_id = g.id), g.updated_at)) AS updated_at \
     FROM games g";

/// Repository for game CRUD.
#[derive(Debug, Clone)]
pub struct GameRepository {
    pool: PgPool,
}

impl GameRepository {
    /// Create a new game repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a game by ID.
    pub async fn find_by_id(&self, id: GameId) -> AppResult<Option<Game>> {
        sqlx::query_as::<_, Game>(&format!("{SELECT_GAME} WHERE g.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to find game"))
    }

    /// List all games, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<Game>> {
        sqlx::query_as::<_, Game>(&format!(
            "{SELECT_GAME} ORDER BY g.created_at DESC, g.id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to list games"))
    }

    /// Whether a game exists.
    pub async fn exists(&self, id: GameId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM games WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to check game"))
    }

    /// Insert a new game row.
    pub async fn create(&self, game: &Game) -> AppResult<Game> {
        sqlx::query_as::<_, Game>(
            "INSERT INTO games (id, name, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(game.id)
        .bind(&game.name)
        .bind(&game.description)
        .bind(game.created_at)
        .bind(game.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to create game"))
    }

    /// Update name and description. Returns `false` if the game is absent.
    pub async fn update(
        &self,
        id: GameId,
        name: &str,
        description: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE games SET name = $2, description = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to update game"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a game; files, versions, commits, and links cascade.
    pub async fn delete(&self, id: GameId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to delete game"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Take a share lock on the game row so it cannot be deleted while the
    /// caller's transaction adds rows under it. Returns `false` if absent.
    pub async fn lock_shared(conn: &mut PgConnection, id: GameId) -> AppResult<bool> {
        let found = sqlx::query_scalar::<_, GameId>("SELECT id FROM games WHERE id = $1 FOR SHARE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| classify(e, "Failed to lock game"))?;
        Ok(found.is_some())
    }

    /// Bump `updated_at` on the game owning a file, inside the caller's
    /// transaction. Returns the game id, or `None` if the file is absent.
    ///
    /// Writers that remove files call this before touching the file row so
    /// the game row is always locked ahead of file rows.
    pub async fn touch_by_file(
        conn: &mut PgConnection,
        file_id: FileId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<GameId>> {
        sqlx::query_scalar::<_, GameId>(
            "UPDATE games SET updated_at = GREATEST(updated_at, $2) \
             WHERE id = (SELECT game_id FROM files WHERE id = $1) RETURNING id",
        )
        .bind(file_id)
        .bind(at)
        .fetch_optional(conn)
        .await
        .map_err(|e| classify(e, "Failed to touch game"))
    }
}
