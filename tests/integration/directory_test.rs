//! Integration tests for game and file directory operations.

mod helpers;

use sqlx::PgPool;

use gameforge::{
    CommitFileInput, CreateCommitRequest, CreateFileRequest, CreateGameRequest, ErrorKind,
    GameId, UpdateFileRequest, UpdateGameRequest,
};

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_create_game_rejects_blank_name(pool: PgPool) {
    let store = helpers::store(pool.clone());

    let err = store
        .games
        .create_game(CreateGameRequest {
            name: "   ".to_string(),
            description: Some("nothing".to_string()),
        })
        .await
        .expect_err("blank name should fail");

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(helpers::count_rows(&pool, "games").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_list_games_newest_first(pool: PgPool) {
    let store = helpers::store(pool);
    let first = helpers::create_game(&store, "Asteroids").await;
    let second = helpers::create_game(&store, "Breakout").await;

    let games = store.games.list_games().await.expect("list games");
    let ids: Vec<GameId> = games.iter().map(|g| g.id).collect();

    assert_eq!(ids, vec![second.id, first.id]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_get_unknown_game_is_not_found(pool: PgPool) {
    let store = helpers::store(pool);

    let err = store
        .games
        .get_game(GameId::new())
        .await
        .expect_err("unknown game");
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = store
        .files
        .list_files(GameId::new())
        .await
        .expect_err("unknown game");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_update_game_changes_name_and_clears_description(pool: PgPool) {
    let store = helpers::store(pool);
    let game = store
        .games
        .create_game(CreateGameRequest {
            name: "Pong".to_string(),
            description: Some("two paddles".to_string()),
        })
        .await
        .expect("create game");

    let updated = store
        .games
        .update_game(
            game.id,
            UpdateGameRequest {
                name: Some("Pong Deluxe".to_string()),
                description: Some(String::new()),
            },
        )
        .await
        .expect("update game");

    assert_eq!(updated.name, "Pong Deluxe");
    assert_eq!(updated.description, None);
    assert!(updated.updated_at >= game.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_create_file_returns_content_and_version_one(pool: PgPool) {
    let store = helpers::store(pool);
    let game = helpers::create_game(&store, "Snake").await;

    let created = helpers::create_file(&store, game.id, "a.js", "x").await;

    assert_eq!(created.file.path, "a.js");
    assert_eq!(created.file.file_type, "js");
    assert_eq!(created.content, "x");
    assert_eq!(created.current_version, 1);

    let content = store
        .files
        .get_file_content(created.file.id)
        .await
        .expect("content");
    assert_eq!(content, "x");

    let files = store.files.list_files(game.id).await.expect("list files");
    assert_eq!(files, vec![created.file]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_create_file_in_unknown_game_is_not_found(pool: PgPool) {
    let store = helpers::store(pool.clone());

    let err = store
        .files
        .create_file(CreateFileRequest {
            game_id: GameId::new(),
            path: "main.js".to_string(),
            file_type: "js".to_string(),
            content: "x".to_string(),
            commit_message: None,
            created_by: None,
            metadata: None,
        })
        .await
        .expect_err("unknown game");

    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(helpers::count_rows(&pool, "files").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_duplicate_path_is_rejected_without_new_rows(pool: PgPool) {
    let store = helpers::store(pool.clone());
    let game = helpers::create_game(&store, "Tetris").await;
    helpers::create_file(&store, game.id, "index.html", "<html></html>").await;

    let err = store
        .files
        .create_file(CreateFileRequest {
            game_id: game.id,
            path: "index.html".to_string(),
            file_type: "html".to_string(),
            content: "<p>dup</p>".to_string(),
            commit_message: None,
            created_by: None,
            metadata: None,
        })
        .await
        .expect_err("duplicate path");

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(helpers::count_rows(&pool, "files").await, 1);
    assert_eq!(helpers::count_rows(&pool, "file_versions").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_same_path_allowed_in_different_games(pool: PgPool) {
    let store = helpers::store(pool);
    let one = helpers::create_game(&store, "One").await;
    let two = helpers::create_game(&store, "Two").await;

    helpers::create_file(&store, one.id, "main.js", "1").await;
    helpers::create_file(&store, two.id, "main.js", "2").await;

    let found = store
        .files
        .get_file_by_path(two.id, "main.js")
        .await
        .expect("by path");
    assert_eq!(found.content, "2");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_snapshot_returns_current_content_by_path(pool: PgPool) {
    let store = helpers::store(pool);
    let game = helpers::create_game(&store, "Maze").await;
    let b = helpers::create_file(&store, game.id, "b.js", "b1").await;
    helpers::create_file(&store, game.id, "a.js", "a1").await;

    store
        .versions
        .update_file(
            b.file.id,
            UpdateFileRequest {
                content: "b2".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    let snapshot = store
        .files
        .get_game_snapshot(game.id)
        .await
        .expect("snapshot");
    let view: Vec<(&str, &str, i32)> = snapshot
        .iter()
        .map(|f| (f.file.path.as_str(), f.content.as_str(), f.current_version))
        .collect();

    assert_eq!(view, vec![("a.js", "a1", 1), ("b.js", "b2", 2)]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_game_updated_at_follows_file_writes(pool: PgPool) {
    let store = helpers::store(pool);
    let game = helpers::create_game(&store, "Racer").await;
    let file = helpers::create_file(&store, game.id, "car.js", "v1").await;

    let version = store
        .versions
        .update_file(
            file.file.id,
            UpdateFileRequest {
                content: "v2".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    let reloaded = store.games.get_game(game.id).await.expect("game");
    assert_eq!(reloaded.updated_at, version.created_at);

    let file = store.files.get_file(file.file.id).await.expect("file");
    assert_eq!(file.updated_at, version.created_at);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_delete_file_cascades_versions_and_links(pool: PgPool) {
    let store = helpers::store(pool.clone());
    let game = helpers::create_game(&store, "Chess").await;
    let board = helpers::create_file(&store, game.id, "board.js", "b").await;
    let pieces = helpers::create_file(&store, game.id, "pieces.js", "p").await;

    store
        .commits
        .create_commit(CreateCommitRequest {
            game_id: game.id,
            message: "Tweak both".to_string(),
            created_by: None,
            files: vec![
                CommitFileInput {
                    file_id: board.file.id,
                    content: "b2".to_string(),
                },
                CommitFileInput {
                    file_id: pieces.file.id,
                    content: "p2".to_string(),
                },
            ],
        })
        .await
        .expect("commit");

    store
        .files
        .delete_file(board.file.id)
        .await
        .expect("delete file");

    assert_eq!(helpers::count_rows(&pool, "files").await, 1);
    assert_eq!(helpers::count_rows(&pool, "file_versions").await, 2);
    assert_eq!(helpers::count_rows(&pool, "commit_files").await, 1);
    assert_eq!(helpers::count_rows(&pool, "commits").await, 1);

    let err = store
        .files
        .delete_file(board.file.id)
        .await
        .expect_err("already deleted");
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = store
        .files
        .get_file_content(board.file.id)
        .await
        .expect_err("deleted file has no content");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_delete_game_cascades_everything(pool: PgPool) {
    let store = helpers::store(pool.clone());
    let keep = helpers::create_game(&store, "Keep").await;
    let doomed = helpers::create_game(&store, "Doomed").await;
    let file = helpers::create_file(&store, doomed.id, "main.js", "v1").await;

    store
        .versions
        .update_file(
            file.file.id,
            UpdateFileRequest {
                content: "v2".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("update");
    store
        .commits
        .create_commit(CreateCommitRequest {
            game_id: doomed.id,
            message: "Third version".to_string(),
            created_by: Some("agent".to_string()),
            files: vec![CommitFileInput {
                file_id: file.file.id,
                content: "v3".to_string(),
            }],
        })
        .await
        .expect("commit");
    assert_eq!(helpers::count_rows(&pool, "file_versions").await, 3);

    store.games.delete_game(doomed.id).await.expect("delete game");

    let games = store.games.list_games().await.expect("list games");
    assert_eq!(games.iter().map(|g| g.id).collect::<Vec<_>>(), vec![keep.id]);

    for table in ["files", "file_versions", "commits", "commit_files"] {
        assert_eq!(helpers::count_rows(&pool, table).await, 0, "{table}");
    }

    let err = store
        .files
        .list_files(doomed.id)
        .await
        .expect_err("game is gone");
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = store
        .commits
        .list_commits(doomed.id)
        .await
        .expect_err("game is gone");
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = store
        .games
        .delete_game(doomed.id)
        .await
        .expect_err("already deleted");
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = store
        .files
        .get_file(file.file.id)
        .await
        .expect_err("file is gone");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_delete_file_racing_commit_never_conflicts(pool: PgPool) {
    let store = helpers::store(pool);

    for round in 0..20 {
        let game = helpers::create_game(&store, &format!("Race {round}")).await;
        let a = helpers::create_file(&store, game.id, "a.js", "a1").await;
        let b = helpers::create_file(&store, game.id, "b.js", "b1").await;

        let (committed, deleted) = tokio::join!(
            store.commits.create_commit(CreateCommitRequest {
                game_id: game.id,
                message: "Touch both".to_string(),
                created_by: None,
                files: vec![
                    CommitFileInput {
                        file_id: a.file.id,
                        content: "a2".to_string(),
                    },
                    CommitFileInput {
                        file_id: b.file.id,
                        content: "b2".to_string(),
                    },
                ],
            }),
            store.files.delete_file(b.file.id),
        );

        deleted.expect("delete must win or wait, never fail");

        let expected_a = match committed {
            Ok(_) => 2,
            Err(err) => {
                assert_eq!(err.kind, ErrorKind::Validation, "round {round}: {err}");
                1
            }
        };
        let history = store
            .versions
            .get_file_history(a.file.id)
            .await
            .expect("history");
        assert_eq!(history.len(), expected_a, "round {round}");
    }
}
