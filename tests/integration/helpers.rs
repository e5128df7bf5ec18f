//! Shared test helpers for integration tests.
//!
//! Each test receives a fresh database from `#[sqlx::test]`, already
//! migrated with the workspace schema.

#![allow(dead_code)]

use sqlx::PgPool;

use gameforge::{
    AppConfig, CreateFileRequest, CreateGameRequest, DatabasePool, FileWithContent, Game, GameId,
    GameStore,
};

/// Build a store over the per-test pool.
pub fn store(pool: PgPool) -> GameStore {
    let config = AppConfig::with_database_url("postgres://unused");
    GameStore::from_pool(DatabasePool::from_pool(pool), &config)
}

/// Create a game with the given name.
pub async fn create_game(store: &GameStore, name: &str) -> Game {
    store
        .games
        .create_game(CreateGameRequest {
            name: name.to_string(),
            description: None,
        })
        .await
        .expect("Failed to create game")
}

/// Create a file with its first version; the type is the extension.
pub async fn create_file(
    store: &GameStore,
    game_id: GameId,
    path: &str,
    content: &str,
) -> FileWithContent {
    let file_type = path.rsplit('.').next().unwrap_or("txt").to_string();
    store
        .files
        .create_file(CreateFileRequest {
            game_id,
            path: path.to_string(),
            file_type,
            content: content.to_string(),
            commit_message: None,
            created_by: None,
            metadata: None,
        })
        .await
        .expect("Failed to create file")
}

/// Count rows in a table.
pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
