//! Integration tests for atomic multi-file commits.

mod helpers;

use futures::future::join_all;
use sqlx::PgPool;

use gameforge::{
    CommitFileInput, CommitId, CreateCommitRequest, ErrorKind, FileId, GameId, PageRequest,
    UpdateFileRequest,
};

fn entry(file_id: FileId, content: &str) -> CommitFileInput {
    CommitFileInput {
        file_id,
        content: content.to_string(),
    }
}

fn commit(game_id: GameId, message: &str, files: Vec<CommitFileInput>) -> CreateCommitRequest {
    CreateCommitRequest {
        game_id,
        message: message.to_string(),
        created_by: Some("agent".to_string()),
        files,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_commit_creates_one_version_per_file(pool: PgPool) {
    let store = helpers::store(pool.clone());
    let game = helpers::create_game(&store, "Platformer").await;
    let html = helpers::create_file(&store, game.id, "index.html", "<body></body>").await;
    let js = helpers::create_file(&store, game.id, "game.js", "let x;").await;

    let created = store
        .commits
        .create_commit(commit(
            game.id,
            "Add jump",
            vec![
                entry(js.file.id, "let x; jump();"),
                entry(html.file.id, "<body><canvas/></body>"),
            ],
        ))
        .await
        .expect("commit");

    assert_eq!(created.game_id, game.id);
    assert_eq!(created.message, "Add jump");
    assert_eq!(helpers::count_rows(&pool, "commit_files").await, 2);

    for (file_id, content) in [
        (js.file.id, "let x; jump();"),
        (html.file.id, "<body><canvas/></body>"),
    ] {
        let latest = store
            .versions
            .get_latest_version(file_id)
            .await
            .expect("latest");
        assert_eq!(latest.version, 2);
        assert_eq!(latest.content, content);
        assert_eq!(latest.commit_message.as_deref(), Some("Add jump"));
        assert_eq!(latest.created_by.as_deref(), Some("agent"));
    }

    let detail = store.commits.get_commit(created.id).await.expect("detail");
    assert_eq!(detail.commit, created);
    let paths: Vec<&str> = detail.files.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(paths, vec!["game.js", "index.html"]);
    assert!(detail.files.iter().all(|m| m.version.version == 2));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_commit_with_identical_content_still_versions(pool: PgPool) {
    let store = helpers::store(pool);
    let game = helpers::create_game(&store, "Static").await;
    let file = helpers::create_file(&store, game.id, "main.js", "same").await;

    store
        .commits
        .create_commit(commit(game.id, "No-op", vec![entry(file.file.id, "same")]))
        .await
        .expect("commit");

    let history = store
        .versions
        .get_file_history(file.file.id)
        .await
        .expect("history");
    assert_eq!(history.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_commit_with_foreign_file_writes_nothing(pool: PgPool) {
    let store = helpers::store(pool.clone());
    let mine = helpers::create_game(&store, "Mine").await;
    let theirs = helpers::create_game(&store, "Theirs").await;
    let own = helpers::create_file(&store, mine.id, "a.js", "a1").await;
    let foreign = helpers::create_file(&store, theirs.id, "b.js", "b1").await;

    let err = store
        .commits
        .create_commit(commit(
            mine.id,
            "Sneaky",
            vec![entry(own.file.id, "a2"), entry(foreign.file.id, "b2")],
        ))
        .await
        .expect_err("foreign file");

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(helpers::count_rows(&pool, "commits").await, 0);
    assert_eq!(helpers::count_rows(&pool, "commit_files").await, 0);
    assert_eq!(helpers::count_rows(&pool, "file_versions").await, 2);

    let content = store
        .files
        .get_file_content(own.file.id)
        .await
        .expect("content");
    assert_eq!(content, "a1");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_commit_rejects_bad_requests(pool: PgPool) {
    let store = helpers::store(pool.clone());
    let game = helpers::create_game(&store, "Strict").await;
    let file = helpers::create_file(&store, game.id, "main.js", "x").await;

    let cases = [
        commit(game.id, "Nothing", Vec::new()),
        commit(game.id, "  ", vec![entry(file.file.id, "y")]),
        commit(
            game.id,
            "Twice",
            vec![entry(file.file.id, "y"), entry(file.file.id, "z")],
        ),
        commit(game.id, "Ghost", vec![entry(FileId::new(), "y")]),
    ];
    for req in cases {
        let err = store
            .commits
            .create_commit(req)
            .await
            .expect_err("invalid commit");
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    let err = store
        .commits
        .create_commit(commit(GameId::new(), "Lost", vec![entry(file.file.id, "y")]))
        .await
        .expect_err("unknown game");
    assert_eq!(err.kind, ErrorKind::NotFound);

    assert_eq!(helpers::count_rows(&pool, "commits").await, 0);
    assert_eq!(helpers::count_rows(&pool, "file_versions").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_list_commits_newest_first(pool: PgPool) {
    let store = helpers::store(pool);
    let game = helpers::create_game(&store, "History").await;
    let file = helpers::create_file(&store, game.id, "main.js", "v1").await;

    let c1 = store
        .commits
        .create_commit(commit(game.id, "First", vec![entry(file.file.id, "v2")]))
        .await
        .expect("first commit");
    let c2 = store
        .commits
        .create_commit(commit(game.id, "Second", vec![entry(file.file.id, "v3")]))
        .await
        .expect("second commit");

    let commits = store.commits.list_commits(game.id).await.expect("list");
    let ids: Vec<CommitId> = commits.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![c2.id, c1.id]);

    let page = store
        .commits
        .list_commits_page(game.id, PageRequest::new(2, 1))
        .await
        .expect("page");
    assert_eq!(page.total_items, 2);
    assert_eq!(page.total_pages, 2);
    assert!(!page.has_next);
    assert_eq!(page.items, vec![c1]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_get_unknown_commit_is_not_found(pool: PgPool) {
    let store = helpers::store(pool);

    let err = store
        .commits
        .get_commit(CommitId::new())
        .await
        .expect_err("unknown commit");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires a PostgreSQL database (DATABASE_URL)"]
async fn test_overlapping_commits_and_updates_stay_contiguous(pool: PgPool) {
    let store = helpers::store(pool.clone());
    let game_id = helpers::create_game(&store, "Busy").await.id;
    let a = helpers::create_file(&store, game_id, "a.js", "a1").await.file.id;
    let b = helpers::create_file(&store, game_id, "b.js", "b1").await.file.id;

    let commits = (0..20).map(|i| {
        let store = store.clone();
        let files = if i % 2 == 0 {
            vec![entry(a, &format!("a from {i}")), entry(b, &format!("b from {i}"))]
        } else {
            vec![entry(b, &format!("b from {i}")), entry(a, &format!("a from {i}"))]
        };
        async move {
            store
                .commits
                .create_commit(commit(game_id, &format!("Commit {i}"), files))
                .await
                .map(|_| ())
        }
    });
    let updates = (0..20).map(|i| {
        let store = store.clone();
        async move {
            store
                .versions
                .update_file(
                    a,
                    UpdateFileRequest {
                        content: format!("a save {i}"),
                        ..Default::default()
                    },
                )
                .await
                .map(|_| ())
        }
    });

    let (commit_results, update_results) = tokio::join!(join_all(commits), join_all(updates));
    for result in commit_results.into_iter().chain(update_results) {
        result.expect("concurrent write");
    }

    for (file_id, expected) in [(a, 41), (b, 21)] {
        let history = store
            .versions
            .get_file_history(file_id)
            .await
            .expect("history");
        let numbers: Vec<i32> = history.iter().map(|v| v.version).collect();
        assert_eq!(numbers, (1..=expected).collect::<Vec<_>>());
    }
    assert_eq!(helpers::count_rows(&pool, "commits").await, 20);
    assert_eq!(helpers::count_rows(&pool, "commit_files").await, 40);
}
