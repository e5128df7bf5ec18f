//! File repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use gameforge_core::result::AppResult;
use gameforge_core::types::{FileId, GameId};
use gameforge_entity::file::{FileWithContent, GameFile};

use crate::error::classify;

/// File columns joined with the content of the highest version.
const SELECT_WITH_CONTENT: &str = "SELECT f.*, v.content, v.version AS current_version FROM files f \
     JOIN LATERAL (\
        SELECT content, version FROM file_versions \
        WHERE file_id = f.id ORDER BY version DESC LIMIT 1\
     ) v ON TRUE";

/// Repository for the per-game file namespace.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: FileId) -> AppResult<Option<GameFile>> {
        sqlx::query_as::<_, GameFile>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to find file"))
    }

    /// List a game's files ordered by path.
    pub async fn find_by_game(&self, game_id: GameId) -> AppResult<Vec<GameFile>> {
        sqlx::query_as::<_, GameFile>("SELECT * FROM files WHERE game_id = $1 ORDER BY path ASC")
            .bind(game_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to list files"))
    }

    /// Find a file and its current content by ID.
    pub async fn find_with_content(&self, id: FileId) -> AppResult<Option<FileWithContent>> {
        sqlx::query_as::<_, FileWithContent>(&format!("{SELECT_WITH_CONTENT} WHERE f.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to load file content"))
    }

    /// Find a file and its current content by path.
    pub async fn find_with_content_by_path(
        &self,
        game_id: GameId,
        path: &str,
    ) -> AppResult<Option<FileWithContent>> {
        sqlx::query_as::<_, FileWithContent>(&format!(
            "{SELECT_WITH_CONTENT} WHERE f.game_id = $1 AND f.path = $2"
        ))
        .bind(game_id)
        .bind(path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to load file by path"))
    }

    /// Every file of a game with its current content, ordered by path.
    pub async fn snapshot(&self, game_id: GameId) -> AppResult<Vec<FileWithContent>> {
        sqlx::query_as::<_, FileWithContent>(&format!(
            "{SELECT_WITH_CONTENT} WHERE f.game_id = $1 ORDER BY f.path ASC"
        ))
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to load game snapshot"))
    }

    /// Insert a file row inside the caller's transaction.
    pub async fn insert(conn: &mut PgConnection, file: &GameFile) -> AppResult<GameFile> {
        sqlx::query_as::<_, GameFile>(
            "INSERT INTO files (id, game_id, path, file_type, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(file.id)
        .bind(file.game_id)
        .bind(&file.path)
        .bind(&file.file_type)
        .bind(file.created_at)
        .bind(file.updated_at)
        .fetch_one(conn)
        .await
        .map_err(|e| classify(e, "Failed to create file"))
    }

    /// Lock one file row for the rest of the transaction.
    ///
    /// Every writer of a file's version sequence takes this lock first, so
    /// reading the current maximum and inserting its successor cannot
    /// interleave with another writer of the same file.
    pub async fn lock(conn: &mut PgConnection, id: FileId) -> AppResult<Option<GameFile>> {
        sqlx::query_as::<_, GameFile>("SELECT * FROM files WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| classify(e, "Failed to lock file"))
    }

    /// Lock several file rows in ascending id order.
    ///
    /// A fixed lock order keeps two commits over overlapping files from
    /// deadlocking. Unknown ids are simply absent from the result.
    pub async fn lock_many(conn: &mut PgConnection, ids: &[FileId]) -> AppResult<Vec<GameFile>> {
        sqlx::query_as::<_, GameFile>(
            "SELECT * FROM files WHERE id = ANY($1) ORDER BY id ASC FOR UPDATE",
        )
        .bind(ids)
        .fetch_all(conn)
        .await
        .map_err(|e| classify(e, "Failed to lock files"))
    }

    /// Bump `updated_at` inside the caller's transaction.
    pub async fn touch(conn: &mut PgConnection, id: FileId, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE files SET updated_at = GREATEST(updated_at, $2) WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(conn)
            .await
            .map_err(|e| classify(e, "Failed to touch file"))?;
        Ok(())
    }

    /// Delete a file; versions and commit links cascade. Returns the
    /// deleted row, or `None` if it did not exist.
    pub async fn delete(conn: &mut PgConnection, id: FileId) -> AppResult<Option<GameFile>> {
        sqlx::query_as::<_, GameFile>("DELETE FROM files WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| classify(e, "Failed to delete file"))
    }
}
