//! GameForge: a versioned multi-file store for game projects.
//!
//! [`GameStore`] wires the database pool, repositories, and services
//! together from an [`AppConfig`]. Routing layers, editors, and generation
//! agents hold one `GameStore` and call into its services.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use gameforge_database::repositories::{
    CommitRepository, FileRepository, GameRepository, VersionRepository,
};

pub use gameforge_core::config::AppConfig;
pub use gameforge_core::error::{AppError, ErrorKind};
pub use gameforge_core::result::AppResult;
pub use gameforge_core::types::{CommitId, FileId, FileVersionId, GameId, PageRequest};
pub use gameforge_database::DatabasePool;
pub use gameforge_entity::{
    Commit, CommitDetail, CommitMember, FileVersion, FileWithContent, Game, GameFile,
};
pub use gameforge_service::{
    CommitFileInput, CommitService, CreateCommitRequest, CreateFileRequest, CreateGameRequest,
    FileService, GameService, UpdateFileRequest, UpdateGameRequest, VersionService,
};

/// All store services sharing one connection pool.
#[derive(Debug, Clone)]
pub struct GameStore {
    db: DatabasePool,
    /// Game CRUD.
    pub games: Arc<GameService>,
    /// File CRUD and current-content reads.
    pub files: Arc<FileService>,
    /// Version writes and history reads.
    pub versions: Arc<VersionService>,
    /// Multi-file commits.
    pub commits: Arc<CommitService>,
}

impl GameStore {
    /// Connect to the configured database, apply migrations if enabled,
    /// and build the services.
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        let db = DatabasePool::connect(&config.database).await?;
        if config.database.run_migrations {
            gameforge_database::migration::run_migrations(db.pool()).await?;
        }
        Ok(Self::from_pool(db, config))
    }

    /// Build the services over an existing pool.
    pub fn from_pool(db: DatabasePool, config: &AppConfig) -> Self {
        let pool = db.pool().clone();

        let game_repo = Arc::new(GameRepository::new(pool.clone()));
        let file_repo = Arc::new(FileRepository::new(pool.clone()));
        let version_repo = Arc::new(VersionRepository::new(pool.clone()));
        let commit_repo = Arc::new(CommitRepository::new(pool));

        let versions = Arc::new(VersionService::new(
            db.clone(),
            version_repo,
            &config.versioning,
        ));
        let games = Arc::new(GameService::new(Arc::clone(&game_repo)));
        let files = Arc::new(FileService::new(
            db.clone(),
            Arc::clone(&game_repo),
            file_repo,
            Arc::clone(&versions),
            &config.versioning,
        ));
        let commits = Arc::new(CommitService::new(
            db.clone(),
            commit_repo,
            game_repo,
            &config.versioning,
        ));

        Self {
            db,
            games,
            files,
            versions,
            commits,
        }
    }

    /// The underlying pool.
    pub fn database(&self) -> &DatabasePool {
        &self.db
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.db.close().await;
    }
}

/// Initialize tracing output from the logging configuration.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}
