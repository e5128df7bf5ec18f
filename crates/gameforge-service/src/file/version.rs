//! File versioning: the only writer of version rows.
//!
//! Every write locks the owning file row, reads the current maximum version
//! number, and inserts `max + 1` in the same transaction. Concurrent
//! writers of one file therefore queue on the row lock and the numbers
//! stay contiguous. Rollback is expressed as a new version carrying old
//! content; history is never rewritten.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tracing::{debug, info};

use gameforge_core::config::VersioningConfig;
use gameforge_core::error::AppError;
use gameforge_core::result::AppResult;
use gameforge_core::types::{self, FileId, FileVersionId};
use gameforge_database::DatabasePool;
use gameforge_database::error::classify;
use gameforge_database::repositories::file::FileRepository;
use gameforge_database::repositories::version::VersionRepository;
use gameforge_entity::file::{FileVersion, GameFile};

use crate::retry::RetryPolicy;
use crate::validation::check_content_size;

/// Data for saving new content to an existing file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFileRequest {
    /// Full new content. May be empty.
    pub content: String,
    /// Optional description of the change.
    pub commit_message: Option<String>,
    /// Optional attribution.
    pub created_by: Option<String>,
    /// Optional opaque annotation.
    pub metadata: Option<serde_json::Value>,
}

/// Everything a new version carries except its number.
#[derive(Debug, Clone, Default)]
pub struct VersionDraft {
    /// Full content.
    pub content: String,
    /// Optional description of the change.
    pub commit_message: Option<String>,
    /// Optional attribution.
    pub created_by: Option<String>,
    /// Optional opaque annotation.
    pub metadata: Option<serde_json::Value>,
}

impl From<UpdateFileRequest> for VersionDraft {
    fn from(req: UpdateFileRequest) -> Self {
        Self {
            content: req.content,
            commit_message: req.commit_message,
            created_by: req.created_by,
            metadata: req.metadata,
        }
    }
}

/// Creates and reads file versions.
#[derive(Debug, Clone)]
pub struct VersionService {
    /// Pool used to open write transactions.
    db: DatabasePool,
    /// Version repository.
    version_repo: Arc<VersionRepository>,
    /// Conflict retry policy.
    retry: RetryPolicy,
    /// Largest accepted content.
    max_content_bytes: usize,
}

impl VersionService {
    /// Creates a new version service.
    pub fn new(
        db: DatabasePool,
        version_repo: Arc<VersionRepository>,
        config: &VersioningConfig,
    ) -> Self {
        Self {
            db,
            version_repo,
            retry: RetryPolicy::from_config(config),
            max_content_bytes: config.max_content_bytes,
        }
    }

    /// Largest content, in bytes, any write may carry.
    pub fn max_content_bytes(&self) -> usize {
        self.max_content_bytes
    }

    /// Inserts version 1 of a freshly inserted file.
    ///
    /// Runs inside the caller's transaction; the file row must have been
    /// created by that same transaction.
    pub async fn create_initial_version(
        conn: &mut PgConnection,
        file: &GameFile,
        draft: VersionDraft,
    ) -> AppResult<FileVersion> {
        let version = FileVersion {
            id: FileVersionId::new(),
            file_id: file.id,
            content: draft.content,
            version: 1,
            commit_message: draft.commit_message,
            created_at: file.created_at,
            created_by: draft.created_by,
            metadata: draft.metadata,
        };
        VersionRepository::insert(conn, &version).await
    }

    /// Appends version `max + 1` to a file.
    ///
    /// The caller must already hold the file row lock in `conn`'s
    /// transaction (see [`FileRepository::lock`]).
    pub(crate) async fn append_version(
        conn: &mut PgConnection,
        file: &GameFile,
        draft: VersionDraft,
    ) -> AppResult<FileVersion> {
        let current = VersionRepository::max_version(&mut *conn, file.id).await?;
        let now = types::now();

        let version = FileVersion {
            id: FileVersionId::new(),
            file_id: file.id,
            content: draft.content,
            version: current + 1,
            commit_message: draft.commit_message,
            created_at: now,
            created_by: draft.created_by,
            metadata: draft.metadata,
        };

        let version = VersionRepository::insert(&mut *conn, &version).await?;
        FileRepository::touch(&mut *conn, file.id, now).await?;
        Ok(version)
    }

    /// Saves new content to a file as its next version.
    pub async fn update_file(
        &self,
        file_id: FileId,
        req: UpdateFileRequest,
    ) -> Result<FileVersion, AppError> {
        check_content_size(&req.content, self.max_content_bytes)?;

        let draft = VersionDraft::from(req);
        let draft = &draft;
        let version = self
            .retry
            .run("update_file", || async move {
                self.try_append(file_id, draft.clone()).await
            })
            .await?;

        info!(
            file_id = %file_id,
            version = version.version,
            created_by = ?version.created_by,
            "File version created"
        );

        Ok(version)
    }

    /// Lists every version of a file, oldest first.
    pub async fn get_file_history(&self, file_id: FileId) -> Result<Vec<FileVersion>, AppError> {
        let history = self.version_repo.find_history(file_id).await?;
        if history.is_empty() {
            return Err(AppError::not_found(format!("File {file_id} not found")));
        }
        debug!(file_id = %file_id, versions = history.len(), "Loaded file history");
        Ok(history)
    }

    /// Gets one version of a file.
    pub async fn get_file_version(
        &self,
        file_id: FileId,
        version: i32,
    ) -> Result<FileVersion, AppError> {
        self.version_repo
            .find_version(file_id, version)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Version {version} of file {file_id} not found"))
            })
    }

    /// Gets the latest version of a file.
    pub async fn get_latest_version(&self, file_id: FileId) -> Result<FileVersion, AppError> {
        self.version_repo
            .find_latest(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} has no versions")))
    }

    /// Rolls a file back by appending a version with an older version's
    /// content and metadata.
    pub async fn restore_version(
        &self,
        file_id: FileId,
        version: i32,
        created_by: Option<String>,
    ) -> Result<FileVersion, AppError> {
        let source = self.get_file_version(file_id, version).await?;

        let restored = self
            .update_file(
                file_id,
                UpdateFileRequest {
                    content: source.content,
                    commit_message: Some(format!("Restore version {version}")),
                    created_by,
                    metadata: source.metadata,
                },
            )
            .await?;

        info!(
            file_id = %file_id,
            restored_from = version,
            version = restored.version,
            "File version restored"
        );

        Ok(restored)
    }

    /// One attempt: lock, number, insert, commit.
    async fn try_append(&self, file_id: FileId, draft: VersionDraft) -> AppResult<FileVersion> {
        let mut tx = self.db.begin().await?;

        let file = FileRepository::lock(&mut *tx, file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        let version = Self::append_version(&mut *tx, &file, draft).await?;

        tx.commit()
            .await
            .map_err(|e| classify(e, "Failed to commit file update"))?;

        Ok(version)
    }
}
