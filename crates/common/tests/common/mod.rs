//! Shared test utilities for wiki integration tests
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use common::identity::{Principal, TokenStore};
use common::wiki::Wiki;
use object_store::{
    KeyValueStore, ListMode, Listing, ObjectInfo, RejectedKey, Storage, StoreError, StoredObject,
};
use parking_lot::Mutex;

/// A wiki over an in-memory store, with `alice` and `bob` registered.
pub struct TestEnv {
    pub wiki: Wiki,
    pub store: Arc<FaultyStore>,
    pub tokens: TokenStore,
    pub alice: Principal,
    pub bob: Principal,
}

pub fn setup_test_env() -> TestEnv {
    let store = Arc::new(FaultyStore::new(Storage::memory()));
    let wiki = Wiki::new(store.clone());
    let tokens = TokenStore::new();
    let alice = tokens.issue_token("alice", None).unwrap();
    let bob = tokens.issue_token("bob", None).unwrap();
    TestEnv {
        wiki,
        store,
        tokens,
        alice,
        bob,
    }
}

impl TestEnv {
    /// Write each key with its own name as content.
    pub async fn seed(&self, keys: &[&str]) {
        for key in keys {
            self.store
                .put(key, Bytes::from(key.to_string()), "text/markdown")
                .await
                .unwrap();
        }
    }

    /// Every key under `prefix`, bypassing authorization.
    pub async fn keys(&self, prefix: &str) -> Vec<String> {
        self.store
            .list(prefix, ListMode::Recursive)
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|item| item.key)
            .collect()
    }

    pub async fn content(&self, key: &str) -> Option<String> {
        self.store
            .get(key)
            .await
            .unwrap()
            .map(|object| String::from_utf8(object.data.to_vec()).unwrap())
    }
}

/// Wraps [`Storage`] and injects failures on demand.
#[derive(Debug)]
pub struct FaultyStore {
    inner: Storage,
    /// Copies whose destination key is in this set fail
    fail_copies_to: Mutex<HashSet<String>>,
    /// Batched deletes reject these keys
    reject_deletes: Mutex<HashSet<String>>,
    /// Every store call fails
    broken: AtomicBool,
    pub delete_many_calls: AtomicUsize,
    pub largest_delete_batch: AtomicUsize,
}

impl FaultyStore {
    pub fn new(inner: Storage) -> Self {
        Self {
            inner,
            fail_copies_to: Mutex::new(HashSet::new()),
            reject_deletes: Mutex::new(HashSet::new()),
            broken: AtomicBool::new(false),
            delete_many_calls: AtomicUsize::new(0),
            largest_delete_batch: AtomicUsize::new(0),
        }
    }

    pub fn fail_copy_to(&self, key: &str) {
        self.fail_copies_to.lock().insert(key.to_string());
    }

    pub fn reject_delete(&self, key: &str) {
        self.reject_deletes.lock().insert(key.to_string());
    }

    pub fn set_broken(&self, broken: bool) {
        self.broken.store(broken, Ordering::SeqCst);
    }

    fn check(&self) -> object_store::Result<()> {
        if self.broken.load(Ordering::SeqCst) {
            Err(StoreError::InvalidConfig("store is unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStore for FaultyStore {
    async fn get(&self, key: &str) -> object_store::Result<Option<StoredObject>> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn head(&self, key: &str) -> object_store::Result<Option<ObjectInfo>> {
        self.check()?;
        self.inner.head(key).await
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> object_store::Result<()> {
        self.check()?;
        self.inner.put(key, data, content_type).await
    }

    async fn delete(&self, key: &str) -> object_store::Result<()> {
        self.check()?;
        self.inner.delete(key).await
    }

    async fn delete_many(&self, keys: &[String]) -> object_store::Result<Vec<RejectedKey>> {
        self.check()?;
        self.delete_many_calls.fetch_add(1, Ordering::SeqCst);
        self.largest_delete_batch
            .fetch_max(keys.len(), Ordering::SeqCst);

        let rejected_set = self.reject_deletes.lock().clone();
        let (rejected, allowed): (Vec<String>, Vec<String>) =
            keys.iter().cloned().partition(|k| rejected_set.contains(k));

        let mut rejected_keys = self.inner.delete_many(&allowed).await?;
        rejected_keys.extend(rejected.into_iter().map(|key| RejectedKey {
            key,
            message: "access denied".to_string(),
        }));
        Ok(rejected_keys)
    }

    async fn list(&self, prefix: &str, mode: ListMode) -> object_store::Result<Listing> {
        self.check()?;
        self.inner.list(prefix, mode).await
    }

    async fn copy_key(&self, src: &str, dst: &str) -> object_store::Result<()> {
        self.check()?;
        if self.fail_copies_to.lock().contains(dst) {
            return Err(StoreError::InvalidConfig(format!("copy to {} refused", dst)));
        }
        self.inner.copy_key(src, dst).await
    }
}
