//! Integration tests for file and directory stat

mod common;

use ::common::wiki::{Stat, WikiError};

#[tokio::test]
async fn test_stat_file() {
    let env = common::setup_test_env();
    env.wiki
        .put_file(&env.alice, "users/alice/a.md", "hello")
        .await
        .unwrap();

    match env.wiki.stat(&env.alice, "users/alice/a.md").await.unwrap() {
        Stat::File { path, size, .. } => {
            assert_eq!(path, "users/alice/a.md");
            assert_eq!(size, 5);
        }
        other => panic!("expected a file, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stat_directory() {
    let env = common::setup_test_env();
    env.wiki
        .put_file(&env.alice, "users/alice/d/a.md", "abc")
        .await
        .unwrap();
    env.wiki
        .put_file(&env.alice, "users/alice/d/b.md", "de")
        .await
        .unwrap();
    env.wiki
        .put_file(&env.alice, "users/alice/d/sub/c.md", "ignored")
        .await
        .unwrap();
    env.wiki
        .create_folder(&env.alice, "users/alice/d/")
        .await
        .unwrap();

    let stat = env.wiki.stat(&env.alice, "users/alice/d/").await.unwrap();
    assert_eq!(
        stat,
        Stat::Directory {
            path: "users/alice/d/".to_string(),
            file_count: 2,
            folder_count: 1,
            total_size: 5,
        }
    );
}

#[tokio::test]
async fn test_stat_missing() {
    let env = common::setup_test_env();
    for path in ["users/alice/nope.md", "users/alice/nope/"] {
        assert!(matches!(
            env.wiki.stat(&env.alice, path).await,
            Err(WikiError::NotFound(_))
        ));
    }
}

#[tokio::test]
async fn test_stat_serializes_with_type_tag() {
    let stat = Stat::Directory {
        path: "users/alice/d/".to_string(),
        file_count: 1,
        folder_count: 0,
        total_size: 3,
    };
    let json = serde_json::to_value(&stat).unwrap();
    assert_eq!(json["type"], "directory");
    assert_eq!(json["file_count"], 1);
}
