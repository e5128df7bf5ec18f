//! File directory operations over a game's path namespace.
//!
//! A file row never stores content. Reads derive the current content from
//! the highest version; creation writes the file row and its version 1 in
//! one transaction so no file is ever observable without content.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use gameforge_core::config::VersioningConfig;
use gameforge_core::error::AppError;
use gameforge_core::result::AppResult;
use gameforge_core::types::{self, FileId, GameId};
use gameforge_database::DatabasePool;
use gameforge_database::error::classify;
use gameforge_database::repositories::file::FileRepository;
use gameforge_database::repositories::game::GameRepository;
use gameforge_entity::file::{FileWithContent, GameFile};

use super::version::{VersionDraft, VersionService};
use crate::retry::RetryPolicy;
use crate::validation::{check_content_size, non_blank, validate_request};

/// Data for creating a file with its first version.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFileRequest {
    /// The owning game.
    pub game_id: GameId,
    /// Path within the game.
    #[validate(custom(function = "non_blank"))]
    pub path: String,
    /// Content kind, e.g. the file extension.
    #[validate(custom(function = "non_blank"))]
    pub file_type: String,
    /// Initial content.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub content: String,
    /// Optional message recorded on version 1.
    pub commit_message: Option<String>,
    /// Optional attribution recorded on version 1.
    pub created_by: Option<String>,
    /// Optional annotation recorded on version 1.
    pub metadata: Option<serde_json::Value>,
}

/// Handles file CRUD within games.
#[derive(Debug, Clone)]
pub struct FileService {
    /// Pool used to open write transactions.
    db: DatabasePool,
    /// Game repository (for ownership checks).
    game_repo: Arc<GameRepository>,
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Versioning engine.
    versions: Arc<VersionService>,
    /// Conflict retry policy.
    retry: RetryPolicy,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        db: DatabasePool,
        game_repo: Arc<GameRepository>,
        file_repo: Arc<FileRepository>,
        versions: Arc<VersionService>,
        config: &VersioningConfig,
    ) -> Self {
        Self {
            db,
            game_repo,
            file_repo,
            versions,
            retry: RetryPolicy::from_config(config),
        }
    }

    /// Lists a game's files (metadata only), ordered by path.
    pub async fn list_files(&self, game_id: GameId) -> Result<Vec<GameFile>, AppError> {
        self.require_game(game_id).await?;
        let files = self.file_repo.find_by_game(game_id).await?;
        debug!(game_id = %game_id, count = files.len(), "Listed files");
        Ok(files)
    }

    /// Creates a file and its version 1 atomically.
    pub async fn create_file(&self, req: CreateFileRequest) -> Result<FileWithContent, AppError> {
        validate_request(&req)?;
        check_content_size(&req.content, self.versions.max_content_bytes())?;

        let mut tx = self.db.begin().await?;

        if !GameRepository::lock_shared(&mut *tx, req.game_id).await? {
            return Err(AppError::not_found(format!("Game {} not found", req.game_id)));
        }

        let now = types::now();
        let file = FileRepository::insert(
            &mut *tx,
            &GameFile {
                id: FileId::new(),
                game_id: req.game_id,
                path: req.path.trim().to_string(),
                file_type: req.file_type.trim().to_string(),
                created_at: now,
                updated_at: now,
            },
        )
        .await?;

        let version = VersionService::create_initial_version(
            &mut *tx,
            &file,
            VersionDraft {
                content: req.content,
                commit_message: req.commit_message,
                created_by: req.created_by,
                metadata: req.metadata,
            },
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| classify(e, "Failed to commit file creation"))?;

        info!(
            game_id = %file.game_id,
            file_id = %file.id,
            path = %file.path,
            "File created"
        );

        Ok(FileWithContent {
            file,
            content: version.content,
            current_version: version.version,
        })
    }

    /// Gets a file's metadata.
    pub async fn get_file(&self, file_id: FileId) -> Result<GameFile, AppError> {
        self.file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// Gets a file together with its current content.
    pub async fn get_file_with_content(
        &self,
        file_id: FileId,
    ) -> Result<FileWithContent, AppError> {
        self.file_repo
            .find_with_content(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// Gets a file's current content: the content of its highest version.
    pub async fn get_file_content(&self, file_id: FileId) -> Result<String, AppError> {
        Ok(self.versions.get_latest_version(file_id).await?.content)
    }

    /// Looks a file up by its path within a game.
    pub async fn get_file_by_path(
        &self,
        game_id: GameId,
        path: &str,
    ) -> Result<FileWithContent, AppError> {
        self.file_repo
            .find_with_content_by_path(game_id, path)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("File '{path}' not found in game {game_id}"))
            })
    }

    /// Every file of a game with its current content, ordered by path.
    pub async fn get_game_snapshot(
        &self,
        game_id: GameId,
    ) -> Result<Vec<FileWithContent>, AppError> {
        self.require_game(game_id).await?;
        self.file_repo.snapshot(game_id).await
    }

    /// Deletes a file with its versions and commit links.
    pub async fn delete_file(&self, file_id: FileId) -> Result<(), AppError> {
        let file = self
            .retry
            .run("delete_file", || async move { self.try_delete(file_id).await })
            .await?;

        info!(game_id = %file.game_id, file_id = %file_id, path = %file.path, "File deleted");

        Ok(())
    }

    /// One delete attempt. The owning game row is locked before the file
    /// row, the same order commits and file creation use.
    async fn try_delete(&self, file_id: FileId) -> AppResult<GameFile> {
        let mut tx = self.db.begin().await?;

        GameRepository::touch_by_file(&mut *tx, file_id, types::now())
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        let file = FileRepository::delete(&mut *tx, file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        tx.commit()
            .await
            .map_err(|e| classify(e, "Failed to commit file deletion"))?;

        Ok(file)
    }

    async fn require_game(&self, game_id: GameId) -> Result<(), AppError> {
        if !self.game_repo.exists(game_id).await? {
            return Err(AppError::not_found(format!("Game {game_id} not found")));
        }
        Ok(())
    }
}
