//! Commit repository implementation.

use sqlx::{PgConnection, PgPool};

use gameforge_core::result::AppResult;
use gameforge_core::types::pagination::{PageRequest, PageResponse};
use gameforge_core::types::{CommitId, GameId};
use gameforge_entity::commit::{Commit, CommitFile, CommitMember};

use crate::error::classify;

/// Repository for commits and their version links.
#[derive(Debug, Clone)]
pub struct CommitRepository {
    pool: PgPool,
}

impl CommitRepository {
    /// Create a new commit repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a commit by ID.
    pub async fn find_by_id(&self, id: CommitId) -> AppResult<Option<Commit>> {
        sqlx::query_as::<_, Commit>("SELECT * FROM commits WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to find commit"))
    }

    /// All commits of a game, most recent first.
    pub async fn find_by_game(&self, game_id: GameId) -> AppResult<Vec<Commit>> {
        sqlx::query_as::<_, Commit>(
            "SELECT * FROM commits WHERE game_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to list commits"))
    }

    /// One page of a game's commits, most recent first.
    pub async fn find_page(
        &self,
        game_id: GameId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Commit>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM commits WHERE game_id = $1")
            .bind(game_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to count commits"))?;

        let commits = sqlx::query_as::<_, Commit>(
            "SELECT * FROM commits WHERE game_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(game_id)
        .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to list commits"))?;

        Ok(PageResponse::new(
            commits,
            page.page.max(1),
            page.limit(),
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    /// Versions created by a commit joined with their files, ordered by path.
    pub async fn find_members(&self, commit_id: CommitId) -> AppResult<Vec<CommitMember>> {
        sqlx::query_as::<_, CommitMember>(
            "SELECT v.*, f.path, f.file_type FROM commit_files cf \
             JOIN file_versions v ON v.id = cf.file_version_id \
             JOIN files f ON f.id = v.file_id \
             WHERE cf.commit_id = $1 ORDER BY f.path ASC",
        )
        .bind(commit_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to list commit files"))
    }

    /// Insert a commit row inside the caller's transaction.
    pub async fn insert(conn: &mut PgConnection, commit: &Commit) -> AppResult<Commit> {
        sqlx::query_as::<_, Commit>(
            "INSERT INTO commits (id, game_id, message, created_at, created_by) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(commit.id)
        .bind(commit.game_id)
        .bind(&commit.message)
        .bind(commit.created_at)
        .bind(&commit.created_by)
        .fetch_one(conn)
        .await
        .map_err(|e| classify(e, "Failed to create commit"))
    }

    /// Link a commit to a version it created, inside the caller's transaction.
    pub async fn link(conn: &mut PgConnection, link: &CommitFile) -> AppResult<CommitFile> {
        sqlx::query_as::<_, CommitFile>(
            "INSERT INTO commit_files (id, commit_id, file_version_id) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(link.id)
        .bind(link.commit_id)
        .bind(link.file_version_id)
        .fetch_one(conn)
        .await
        .map_err(|e| classify(e, "Failed to link commit file"))
    }
}
