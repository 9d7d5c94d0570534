//! Integration tests for file and subtree moves

mod common;

use ::common::wiki::WikiError;

#[tokio::test]
async fn test_mv_file() {
    let env = common::setup_test_env();
    env.seed(&["users/alice/a.md"]).await;

    env.wiki
        .mv(&env.alice, "users/alice/a.md", "users/alice/renamed.md", false)
        .await
        .unwrap();

    assert_eq!(env.keys("users/alice/").await, vec!["users/alice/renamed.md"]);
    assert_eq!(
        env.content("users/alice/renamed.md").await.as_deref(),
        Some("users/alice/a.md")
    );
}

#[tokio::test]
async fn test_mv_file_onto_itself() {
    let env = common::setup_test_env();
    env.seed(&["users/alice/a.md"]).await;

    assert!(matches!(
        env.wiki
            .mv(&env.alice, "users/alice/a.md", "users/alice/a.md", false)
            .await,
        Err(WikiError::Validation(_))
    ));
    assert!(env.content("users/alice/a.md").await.is_some());
}

#[tokio::test]
async fn test_mv_failed_copy_keeps_source() {
    let env = common::setup_test_env();
    env.seed(&["users/alice/a.md"]).await;
    env.store.fail_copy_to("users/alice/b.md");

    assert!(matches!(
        env.wiki
            .mv(&env.alice, "users/alice/a.md", "users/alice/b.md", false)
            .await,
        Err(WikiError::Store(_))
    ));
    assert_eq!(env.keys("users/alice/").await, vec!["users/alice/a.md"]);
}

#[tokio::test]
async fn test_mv_subtree() {
    let env = common::setup_test_env();
    env.seed(&[
        "users/alice/old/a.md",
        "users/alice/old/sub/b.md",
        "users/alice/oldish.md",
    ])
    .await;

    let report = env
        .wiki
        .mv(&env.alice, "users/alice/old/", "users/alice/new/", true)
        .await
        .unwrap();
    assert!(report.is_complete());
    assert_eq!(report.total_keys, 2);

    assert_eq!(
        env.keys("users/alice/").await,
        vec![
            "users/alice/new/a.md",
            "users/alice/new/sub/b.md",
            "users/alice/oldish.md",
        ]
    );
}

#[tokio::test]
async fn test_mv_subtree_failed_copy_skips_delete() {
    let env = common::setup_test_env();
    env.seed(&["users/alice/old/a.md", "users/alice/old/b.md"]).await;
    env.store.fail_copy_to("users/alice/new/b.md");

    let report = env
        .wiki
        .mv(&env.alice, "users/alice/old/", "users/alice/new/", true)
        .await
        .unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.failures[0].key, "users/alice/old/b.md");
    // every source key survives
    assert_eq!(
        env.keys("users/alice/old/").await,
        vec!["users/alice/old/a.md", "users/alice/old/b.md"]
    );
}

#[tokio::test]
async fn test_mv_subtree_into_descendant() {
    let env = common::setup_test_env();
    env.seed(&["users/alice/a/x.md"]).await;

    assert!(matches!(
        env.wiki
            .mv(&env.alice, "users/alice/a/", "users/alice/a/b/", true)
            .await,
        Err(WikiError::Validation(_))
    ));
    // a sibling sharing the string prefix is fine
    env.wiki
        .mv(&env.alice, "users/alice/a/", "users/alice/ab/", true)
        .await
        .unwrap();
    assert_eq!(env.keys("users/alice/").await, vec!["users/alice/ab/x.md"]);
}

#[tokio::test]
async fn test_mv_empty_subtree() {
    let env = common::setup_test_env();
    let report = env
        .wiki
        .mv(&env.alice, "users/alice/none/", "users/alice/other/", true)
        .await
        .unwrap();
    assert_eq!(report.total_keys, 0);
}

#[tokio::test]
async fn test_mv_out_of_own_tree_denied() {
    let env = common::setup_test_env();
    env.seed(&["users/alice/a/x.md"]).await;

    assert!(matches!(
        env.wiki
            .mv(&env.alice, "users/alice/a/", "users/bob/a/", true)
            .await,
        Err(WikiError::AccessDenied(_))
    ));
    assert_eq!(env.keys("users/alice/").await, vec!["users/alice/a/x.md"]);
}

#[tokio::test]
async fn test_mv_subtree_into_ancestor() {
    let env = common::setup_test_env();
    env.seed(&["users/alice/x/f.md", "users/alice/x/x/f.md"]).await;

    assert!(matches!(
        env.wiki
            .mv(&env.alice, "users/alice/x/", "users/alice/", true)
            .await,
        Err(WikiError::Validation(_))
    ));
    assert_eq!(
        env.keys("users/alice/").await,
        vec!["users/alice/x/f.md", "users/alice/x/x/f.md"]
    );
    assert_eq!(
        env.content("users/alice/x/x/f.md").await.as_deref(),
        Some("users/alice/x/x/f.md")
    );
}

#[tokio::test]
async fn test_mv_subtree_failed_delete_keeps_both() {
    let env = common::setup_test_env();
    env.seed(&["users/alice/old/a.md", "users/alice/old/b.md"]).await;
    env.store.reject_delete("users/alice/old/b.md");

    let report = env
        .wiki
        .mv(&env.alice, "users/alice/old/", "users/alice/new/", true)
        .await
        .unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.total_keys, 2);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].key, "users/alice/old/b.md");
    // destination is whole, the undeleted source key is still there
    assert_eq!(
        env.keys("users/alice/new/").await,
        vec!["users/alice/new/a.md", "users/alice/new/b.md"]
    );
    assert_eq!(env.keys("users/alice/old/").await, vec!["users/alice/old/b.md"]);
}
