//! Integration tests for file and subtree copies

mod common;

use ::common::wiki::WikiError;

#[tokio::test]
async fn test_cp_file() {
    let env = common::setup_test_env();
    env.seed(&["users/alice/a.md"]).await;

    let report = env
        .wiki
        .copy(&env.alice, "users/alice/a.md", "users/alice/archive/a.md", false)
        .await
        .unwrap();
    assert_eq!(report.succeeded, 1);

    assert_eq!(
        env.content("users/alice/archive/a.md").await.as_deref(),
        Some("users/alice/a.md")
    );
    assert!(env.content("users/alice/a.md").await.is_some());
}

#[tokio::test]
async fn test_cp_missing_file() {
    let env = common::setup_test_env();
    assert!(matches!(
        env.wiki
            .copy(&env.alice, "users/alice/ghost.md", "users/alice/b.md", false)
            .await,
        Err(WikiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_cp_subtree() {
    let env = common::setup_test_env();
    env.seed(&[
        "users/alice/src/a.md",
        "users/alice/src/.keep",
        "users/alice/src/deep/b.md",
        "users/alice/srcx/c.md",
    ])
    .await;

    let report = env
        .wiki
        .copy(&env.alice, "users/alice/src", "users/alice/dst", true)
        .await
        .unwrap();
    assert!(report.is_complete());
    assert_eq!(report.total_keys, 3);

    assert_eq!(
        env.keys("users/alice/dst/").await,
        vec![
            "users/alice/dst/.keep",
            "users/alice/dst/a.md",
            "users/alice/dst/deep/b.md",
        ]
    );
    assert_eq!(
        env.content("users/alice/dst/deep/b.md").await.as_deref(),
        Some("users/alice/src/deep/b.md")
    );
    // source untouched
    assert_eq!(env.keys("users/alice/src/").await.len(), 3);
}

#[tokio::test]
async fn test_cp_subtree_into_itself() {
    let env = common::setup_test_env();
    env.seed(&["users/alice/src/a.md"]).await;

    for dst in ["users/alice/src/", "users/alice/src/inner/"] {
        assert!(matches!(
            env.wiki.copy(&env.alice, "users/alice/src/", dst, true).await,
            Err(WikiError::Validation(_))
        ));
    }
    assert_eq!(env.keys("users/alice/").await, vec!["users/alice/src/a.md"]);
}

#[tokio::test]
async fn test_cp_subtree_partial_failure() {
    let env = common::setup_test_env();
    env.seed(&["users/alice/src/a.md", "users/alice/src/b.md"]).await;
    env.store.fail_copy_to("users/alice/dst/b.md");

    let report = env
        .wiki
        .copy(&env.alice, "users/alice/src/", "users/alice/dst/", true)
        .await
        .unwrap();
    assert_eq!(report.total_keys, 2);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].key, "users/alice/src/b.md");
}

#[tokio::test]
async fn test_cp_across_users_denied() {
    let env = common::setup_test_env();
    env.seed(&["users/bob/a.md", "users/alice/a.md"]).await;

    assert!(matches!(
        env.wiki
            .copy(&env.alice, "users/bob/a.md", "users/alice/stolen.md", false)
            .await,
        Err(WikiError::AccessDenied(_))
    ));
    assert!(matches!(
        env.wiki
            .copy(&env.alice, "users/alice/a.md", "users/bob/gift.md", false)
            .await,
        Err(WikiError::AccessDenied(_))
    ));
    assert_eq!(env.keys("users/bob/").await, vec!["users/bob/a.md"]);
}

#[tokio::test]
async fn test_cp_subtree_into_ancestor() {
    let env = common::setup_test_env();
    env.seed(&["users/alice/x/f.md", "users/alice/x/x/f.md"]).await;

    for dst in ["users/alice/", "users/alice"] {
        assert!(matches!(
            env.wiki.copy(&env.alice, "users/alice/x/", dst, true).await,
            Err(WikiError::Validation(_))
        ));
    }
    assert_eq!(
        env.content("users/alice/x/x/f.md").await.as_deref(),
        Some("users/alice/x/x/f.md")
    );
    assert_eq!(
        env.keys("users/alice/").await,
        vec!["users/alice/x/f.md", "users/alice/x/x/f.md"]
    );
}

#[tokio::test]
async fn test_cp_subtree_with_reserved_characters() {
    let env = common::setup_test_env();
    env.seed(&["users/alice/src/100%.md", "users/alice/src/a#b.md"])
        .await;

    let listing = env
        .wiki
        .list_children(&env.alice, "users/alice/src/")
        .await
        .unwrap();
    let mut names: Vec<_> = listing.iter().map(|entry| entry.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["100%.md", "a#b.md"]);

    let report = env
        .wiki
        .copy(&env.alice, "users/alice/src/", "users/alice/dst/", true)
        .await
        .unwrap();
    assert!(report.is_complete());
    assert_eq!(report.succeeded, 2);
    assert_eq!(
        env.content("users/alice/dst/100%.md").await.as_deref(),
        Some("users/alice/src/100%.md")
    );
    assert_eq!(
        env.content("users/alice/dst/a#b.md").await.as_deref(),
        Some("users/alice/src/a#b.md")
    );
}
