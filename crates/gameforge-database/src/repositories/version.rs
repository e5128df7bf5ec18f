//! File version repository implementation.

use sqlx::{PgConnection, PgPool};

use gameforge_core::result::AppResult;
use gameforge_core::types::FileId;
use gameforge_entity::file::FileVersion;

use crate::error::classify;

/// Repository for immutable file versions.
#[derive(Debug, Clone)]
pub struct VersionRepository {
    pool: PgPool,
}

impl VersionRepository {
    /// Create a new version repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All versions of a file, oldest first.
    pub async fn find_history(&self, file_id: FileId) -> AppResult<Vec<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = $1 ORDER BY version ASC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to list file versions"))
    }

    /// A specific version of a file.
    pub async fn find_version(
        &self,
        file_id: FileId,
        version: i32,
    ) -> AppResult<Option<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = $1 AND version = $2",
        )
        .bind(file_id)
        .bind(version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to find file version"))
    }

    /// The highest-numbered version of a file.
    pub async fn find_latest(&self, file_id: FileId) -> AppResult<Option<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = $1 ORDER BY version DESC LIMIT 1",
        )
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to find latest version"))
    }

    /// Current maximum version number, `0` when the file has none.
    ///
    /// Only meaningful while the caller holds the file row lock.
    pub async fn max_version(conn: &mut PgConnection, file_id: FileId) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(version), 0) FROM file_versions WHERE file_id = $1",
        )
        .bind(file_id)
        .fetch_one(conn)
        .await
        .map_err(|e| classify(e, "Failed to read current version"))
    }

    /// Insert a version row inside the caller's transaction.
    pub async fn insert(conn: &mut PgConnection, version: &FileVersion) -> AppResult<FileVersion> {
        sqlx::query_as::<_, FileVersion>(
            "INSERT INTO file_versions \
             (id, file_id, content, version, commit_message, created_at, created_by, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(version.id)
        .bind(version.file_id)
        .bind(&version.content)
        .bind(version.version)
        .bind(&version.commit_message)
        .bind(version.created_at)
        .bind(&version.created_by)
        .bind(&version.metadata)
        .fetch_one(conn)
        .await
        .map_err(|e| classify(e, "Failed to create file version"))
    }
}
