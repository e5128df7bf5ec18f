//! Atomic multi-file checkpoints.
//!
//! A commit inserts its own row, one new version per listed file, and one
//! link per version inside a single transaction. Any failure, including a
//! file that belongs to another game, rolls every row back.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use gameforge_core::config::VersioningConfig;
use gameforge_core::error::AppError;
use gameforge_core::result::AppResult;
use gameforge_core::types::pagination::{PageRequest, PageResponse};
use gameforge_core::types::{self, CommitFileId, CommitId, FileId, GameId};
use gameforge_database::DatabasePool;
use gameforge_database::error::classify;
use gameforge_database::repositories::commit::CommitRepository;
use gameforge_database::repositories::file::FileRepository;
use gameforge_database::repositories::game::GameRepository;
use gameforge_entity::commit::{Commit, CommitDetail, CommitFile};
use gameforge_entity::file::GameFile;

use crate::file::version::{VersionDraft, VersionService};
use crate::retry::RetryPolicy;
use crate::validation::{check_content_size, non_blank, validate_request};

/// New content for one file in a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitFileInput {
    /// The file to update.
    pub file_id: FileId,
    /// Its full new content.
    pub content: String,
}

/// Data for creating a commit.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommitRequest {
    /// The game every listed file must belong to.
    pub game_id: GameId,
    /// Commit message, also recorded on every created version.
    #[validate(custom(function = "non_blank"))]
    pub message: String,
    /// Optional attribution.
    pub created_by: Option<String>,
    /// Files to update. Each yields exactly one new version, even when the
    /// content equals the current content.
    #[validate(length(min = 1, message = "a commit needs at least one file"))]
    pub files: Vec<CommitFileInput>,
}

/// Creates and reads commits.
#[derive(Debug, Clone)]
pub struct CommitService {
    /// Pool used to open write transactions.
    db: DatabasePool,
    /// Commit repository.
    commit_repo: Arc<CommitRepository>,
    /// Game repository.
    game_repo: Arc<GameRepository>,
    /// Conflict retry policy.
    retry: RetryPolicy,
    /// Largest accepted content.
    max_content_bytes: usize,
}

impl CommitService {
    /// Creates a new commit service.
    pub fn new(
        db: DatabasePool,
        commit_repo: Arc<CommitRepository>,
        game_repo: Arc<GameRepository>,
        config: &VersioningConfig,
    ) -> Self {
        Self {
            db,
            commit_repo,
            game_repo,
            retry: RetryPolicy::from_config(config),
            max_content_bytes: config.max_content_bytes,
        }
    }

    /// Creates a commit over one or more files of a game, all or nothing.
    pub async fn create_commit(&self, req: CreateCommitRequest) -> Result<Commit, AppError> {
        validate_request(&req)?;
        reject_duplicate_files(&req.files)?;
        for entry in &req.files {
            check_content_size(&entry.content, self.max_content_bytes)?;
        }

        let req = &req;
        let commit = self
            .retry
            .run("create_commit", || async move { self.try_create(req).await })
            .await?;

        info!(
            game_id = %commit.game_id,
            commit_id = %commit.id,
            files = req.files.len(),
            created_by = ?commit.created_by,
            "Commit created"
        );

        Ok(commit)
    }

    /// Lists a game's commits, most recent first.
    pub async fn list_commits(&self, game_id: GameId) -> Result<Vec<Commit>, AppError> {
        self.require_game(game_id).await?;
        let commits = self.commit_repo.find_by_game(game_id).await?;
        debug!(game_id = %game_id, count = commits.len(), "Listed commits");
        Ok(commits)
    }

    /// Lists one page of a game's commits, most recent first.
    pub async fn list_commits_page(
        &self,
        game_id: GameId,
        page: PageRequest,
    ) -> Result<PageResponse<Commit>, AppError> {
        self.require_game(game_id).await?;
        self.commit_repo.find_page(game_id, &page).await
    }

    /// Gets a commit with the versions it created and their files.
    pub async fn get_commit(&self, commit_id: CommitId) -> Result<CommitDetail, AppError> {
        let commit = self
            .commit_repo
            .find_by_id(commit_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Commit {commit_id} not found")))?;

        let files = self.commit_repo.find_members(commit_id).await?;

        Ok(CommitDetail { commit, files })
    }

    /// One attempt inside a fresh transaction.
    async fn try_create(&self, req: &CreateCommitRequest) -> AppResult<Commit> {
        let mut tx = self.db.begin().await?;

        if !GameRepository::lock_shared(&mut *tx, req.game_id).await? {
            return Err(AppError::not_found(format!("Game {} not found", req.game_id)));
        }

        let commit = CommitRepository::insert(
            &mut *tx,
            &Commit {
                id: CommitId::new(),
                game_id: req.game_id,
                message: req.message.trim().to_string(),
                created_at: types::now(),
                created_by: req.created_by.clone(),
            },
        )
        .await?;

        let mut ids: Vec<FileId> = req.files.iter().map(|f| f.file_id).collect();
        ids.sort();
        let locked: HashMap<FileId, GameFile> = FileRepository::lock_many(&mut *tx, &ids)
            .await?
            .into_iter()
            .map(|f| (f.id, f))
            .collect();

        for entry in &req.files {
            let file = owned_file(&locked, entry.file_id, req.game_id)?;

            let version = VersionService::append_version(
                &mut *tx,
                file,
                VersionDraft {
                    content: entry.content.clone(),
                    commit_message: Some(commit.message.clone()),
                    created_by: commit.created_by.clone(),
                    metadata: None,
                },
            )
            .await?;

            CommitRepository::link(
                &mut *tx,
                &CommitFile {
                    id: CommitFileId::new(),
                    commit_id: commit.id,
                    file_version_id: version.id,
                },
            )
            .await?;

            debug!(
                commit_id = %commit.id,
                file_id = %file.id,
                version = version.version,
                "Commit member written"
            );
        }

        tx.commit()
            .await
            .map_err(|e| classify(e, "Failed to commit changes"))?;

        Ok(commit)
    }

    async fn require_game(&self, game_id: GameId) -> Result<(), AppError> {
        if !self.game_repo.exists(game_id).await? {
            return Err(AppError::not_found(format!("Game {game_id} not found")));
        }
        Ok(())
    }
}

/// A commit may name each file at most once.
fn reject_duplicate_files(files: &[CommitFileInput]) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(files.len());
    for entry in files {
        if !seen.insert(entry.file_id) {
            return Err(AppError::validation(format!(
                "File {} is listed more than once",
                entry.file_id
            )));
        }
    }
    Ok(())
}

/// Resolve a locked file and check it belongs to the commit's game.
fn owned_file(
    locked: &HashMap<FileId, GameFile>,
    file_id: FileId,
    game_id: GameId,
) -> AppResult<&GameFile> {
    let file = locked
        .get(&file_id)
        .ok_or_else(|| AppError::validation(format!("File {file_id} does not exist")))?;
    if file.game_id != game_id {
        return Err(AppError::validation(format!(
            "File {file_id} does not belong to game {game_id}"
        )));
    }
    Ok(file)
}
