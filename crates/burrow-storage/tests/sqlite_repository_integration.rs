use std::path::PathBuf;
use std::sync::Arc;

use burrow_storage::{ReadRepository, Repository, SqliteConfig, SqliteRepository, StorageError};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    path: PathBuf,
    repo: SqliteRepository,
}

impl Fixture {
    async fn start() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("burrow.db");
        let repo = SqliteRepository::open(&path).await.expect("open store");

        Self {
            _dir: dir,
            path,
            repo,
        }
    }
}

#[tokio::test]
async fn save_then_get_returns_url() {
    let fixture = Fixture::start().await;

    let id = fixture.repo.save("https://example.com", "ex1").await.unwrap();

    assert_eq!(id, 1);
    assert_eq!(fixture.repo.get("ex1").await.unwrap(), "https://example.com");
}

#[tokio::test]
async fn save_conflicts_when_alias_already_exists() {
    let fixture = Fixture::start().await;

    fixture.repo.save("https://one.example", "dup").await.unwrap();
    let err = fixture
        .repo
        .save("https://two.example", "dup")
        .await
        .unwrap_err();

    assert_eq!(err, StorageError::AliasExists("dup".to_string()));
    assert_eq!(fixture.repo.get("dup").await.unwrap(), "https://one.example");
}

#[tokio::test]
async fn same_url_under_different_aliases() {
    let fixture = Fixture::start().await;

    let first = fixture.repo.save("https://example.com", "a1").await.unwrap();
    let second = fixture.repo.save("https://example.com", "a2").await.unwrap();

    assert!(second > first);
    assert_eq!(fixture.repo.get("a2").await.unwrap(), "https://example.com");
}

#[tokio::test]
async fn get_unknown_alias_is_not_found() {
    let fixture = Fixture::start().await;

    let err = fixture.repo.get("missing").await.unwrap_err();
    assert_eq!(err, StorageError::NotFound("missing".to_string()));
}

#[tokio::test]
async fn delete_unknown_alias_succeeds() {
    let fixture = Fixture::start().await;

    fixture.repo.delete("missing").await.unwrap();
}

#[tokio::test]
async fn delete_makes_alias_unknown_and_reusable() {
    let fixture = Fixture::start().await;

    fixture.repo.save("https://example.com", "ex1").await.unwrap();
    fixture.repo.delete("ex1").await.unwrap();
    assert!(fixture.repo.get("ex1").await.unwrap_err().is_not_found());

    fixture.repo.save("https://other.com", "ex1").await.unwrap();
    assert_eq!(fixture.repo.get("ex1").await.unwrap(), "https://other.com");
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    let fixture = Fixture::start().await;

    assert_eq!(fixture.repo.save("https://a.example", "a").await.unwrap(), 1);
    assert_eq!(fixture.repo.save("https://b.example", "b").await.unwrap(), 2);
    fixture.repo.delete("b").await.unwrap();

    assert_eq!(fixture.repo.save("https://c.example", "c").await.unwrap(), 3);
}

#[tokio::test]
async fn full_lifecycle_scenario() {
    let fixture = Fixture::start().await;
    let repo = &fixture.repo;

    assert_eq!(repo.save("https://example.com", "ex1").await.unwrap(), 1);
    assert_eq!(repo.get("ex1").await.unwrap(), "https://example.com");
    assert!(repo
        .save("https://other.com", "ex1")
        .await
        .unwrap_err()
        .is_alias_exists());
    repo.delete("ex1").await.unwrap();
    assert!(repo.get("ex1").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn reopen_keeps_data_and_schema() {
    let fixture = Fixture::start().await;
    fixture.repo.save("https://example.com", "kept").await.unwrap();
    fixture.repo.close().await;

    let reopened = SqliteRepository::open(&fixture.path).await.unwrap();

    assert_eq!(reopened.get("kept").await.unwrap(), "https://example.com");
    assert_eq!(reopened.save("https://next.example", "next").await.unwrap(), 2);
}

#[tokio::test]
async fn open_fails_for_unusable_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("burrow.db");

    let err = SqliteRepository::open(&path).await.unwrap_err();

    match err {
        StorageError::Failure { op, .. } => assert_eq!(op, "storage.sqlite.open"),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_saves_of_same_alias_have_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let config = SqliteConfig::builder().max_connections(8).build();
    let repo = Arc::new(
        SqliteRepository::open_with(dir.path().join("race.db"), config)
            .await
            .unwrap(),
    );

    let mut handles = vec![];
    for i in 0..8 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.save(&format!("https://example{i}.com"), "race").await
        }));
    }

    let mut saved = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => saved += 1,
            Err(StorageError::AliasExists(_)) => conflicts += 1,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    assert_eq!(saved, 1);
    assert_eq!(conflicts, 7);
}

#[tokio::test]
async fn open_memory_location_shares_one_database() {
    let repo = Arc::new(SqliteRepository::open(":memory:").await.unwrap());

    let mut handles = vec![];
    for i in 0..10 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.save("https://example.com", &format!("a{i}")).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let mut handles = vec![];
    for i in 0..10 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(
            async move { repo.get(&format!("a{i}")).await },
        ));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "https://example.com");
    }
}
