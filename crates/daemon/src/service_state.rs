use std::sync::Arc;

use common::identity::TokenStore;
use common::wiki::Wiki;
use object_store::{KeyValueStore, Storage, StoreError};

use crate::ServiceConfig;

/// Everything a request handler needs, cheap to clone.
#[derive(Debug, Clone)]
pub struct State {
    wiki: Wiki,
    tokens: TokenStore,
    allow_registration: bool,
}

impl State {
    pub fn new(store: Arc<dyn KeyValueStore>, tokens: TokenStore, allow_registration: bool) -> Self {
        Self {
            wiki: Wiki::new(store),
            tokens,
            allow_registration,
        }
    }

    pub async fn from_config(config: &ServiceConfig) -> Result<Self, StateSetupError> {
        let storage = Storage::new(config.store.clone()).await?;
        tracing::info!(store = ?store_kind(config), "object store ready");

        let state = Self::new(Arc::new(storage), TokenStore::new(), config.allow_registration);
        if config.seed_demo_principals {
            state.seed_demo_principals().await;
        }
        Ok(state)
    }

    pub fn wiki(&self) -> &Wiki {
        &self.wiki
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn allow_registration(&self) -> bool {
        self.allow_registration
    }

    /// Register the demo principals and give each a welcome page.
    async fn seed_demo_principals(&self) {
        for principal in self.tokens.seed_demo_principals() {
            if let Err(e) = self.wiki.init_user_directory(&principal).await {
                tracing::warn!(principal = %principal.id, error = %e, "failed to seed welcome page");
            }
            // development only: the secret is how the operator logs in
            tracing::info!(
                principal = %principal.id,
                secret_key = %principal.secret_key,
                "seeded demo principal"
            );
        }
    }
}

fn store_kind(config: &ServiceConfig) -> &'static str {
    match config.store {
        object_store::ObjectStoreConfig::Memory => "memory",
        object_store::ObjectStoreConfig::Local { .. } => "local",
        object_store::ObjectStoreConfig::S3 { .. } => "s3",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("object store error: {0}")]
    Store(#[from] StoreError),
}
