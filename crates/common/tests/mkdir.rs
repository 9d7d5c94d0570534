//! Integration tests for folder creation and user initialization

mod common;

use ::common::wiki::{WikiError, WELCOME_PAGE};

#[tokio::test]
async fn test_mkdir_writes_marker() {
    let env = common::setup_test_env();

    let marker = env
        .wiki
        .create_folder(&env.alice, "users/alice/projects")
        .await
        .unwrap();
    assert_eq!(marker, "users/alice/projects/.keep");
    assert_eq!(env.content(&marker).await.as_deref(), Some(""));

    let root = env
        .wiki
        .list_children(&env.alice, "users/alice/")
        .await
        .unwrap();
    assert_eq!(root.len(), 1);
    assert_eq!(root[0].key, "users/alice/projects/");
}

#[tokio::test]
async fn test_mkdir_nested_creates_parents_implicitly() {
    let env = common::setup_test_env();
    env.wiki
        .create_folder(&env.alice, "users/alice/a/b/c/")
        .await
        .unwrap();

    let a = env
        .wiki
        .list_children(&env.alice, "users/alice/a/")
        .await
        .unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(a[0].name, "b");
}

#[tokio::test]
async fn test_mkdir_denied_outside_prefix() {
    let env = common::setup_test_env();
    assert!(matches!(
        env.wiki.create_folder(&env.alice, "users/bob/x/").await,
        Err(WikiError::AccessDenied(_))
    ));
    assert!(env.keys("users/bob/").await.is_empty());
}

#[tokio::test]
async fn test_put_rejects_marker_name() {
    let env = common::setup_test_env();
    assert!(matches!(
        env.wiki
            .put_file(&env.alice, "users/alice/dir/.keep", "x")
            .await,
        Err(WikiError::Validation(_))
    ));
}

#[tokio::test]
async fn test_init_user_directory() {
    let env = common::setup_test_env();

    assert!(env.wiki.init_user_directory(&env.alice).await.unwrap());
    assert_eq!(env.keys("users/alice/").await, vec!["users/alice/welcome.md"]);
    assert_eq!(
        env.content("users/alice/welcome.md").await.as_deref(),
        Some(WELCOME_PAGE)
    );

    // existing content is left alone
    env.wiki
        .put_file(&env.alice, "users/alice/welcome.md", "edited")
        .await
        .unwrap();
    assert!(!env.wiki.init_user_directory(&env.alice).await.unwrap());
    assert_eq!(
        env.content("users/alice/welcome.md").await.as_deref(),
        Some("edited")
    );
}

#[tokio::test]
async fn test_init_skips_non_empty_tree() {
    let env = common::setup_test_env();
    env.seed(&["users/bob/notes/a.md"]).await;

    assert!(!env.wiki.init_user_directory(&env.bob).await.unwrap());
    assert_eq!(env.keys("users/bob/").await, vec!["users/bob/notes/a.md"]);
}
