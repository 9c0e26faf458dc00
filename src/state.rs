use std::sync::Arc;

use crate::auth::{Accounts, TokenKeys};
use crate::config::{Config, StoreBackend};
use crate::files::FileStore;
use crate::repository::TaskRepository;
use crate::store::{BlobStore, MemoryStore, MongoStore, StoreError, TaskStore, UserStore};

/// Everything a handler needs, built once at startup and shared via `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub accounts: Accounts,
    pub tokens: TokenKeys,
    pub tasks: TaskRepository,
    pub files: FileStore,
}

impl AppState {
    /// Wires every component to one store that holds users, tasks and blobs.
    pub fn new<S>(config: Config, store: Arc<S>) -> Self
    where
        S: UserStore + TaskStore + BlobStore + 'static,
    {
        let tokens = TokenKeys::from_secret(&config.jwt_secret);
        let users: Arc<dyn UserStore> = store.clone();
        let tasks: Arc<dyn TaskStore> = store.clone();
        let blobs: Arc<dyn BlobStore> = store;

        Self {
            accounts: Accounts::new(users, tokens.clone(), config.bcrypt_cost),
            tokens,
            tasks: TaskRepository::new(tasks),
            files: FileStore::new(blobs, config.max_upload_bytes),
            config: Arc::new(config),
        }
    }

    /// Opens the backend selected by `config.store_backend`.
    pub async fn connect(config: Config) -> Result<Self, StoreError> {
        match config.store_backend {
            StoreBackend::Mongo => {
                let store = MongoStore::connect(&config).await?;
                Ok(Self::new(config, Arc::new(store)))
            }
            StoreBackend::Memory => {
                log::warn!("Using the in-memory store; data is lost on restart");
                Ok(Self::new(config, Arc::new(MemoryStore::new())))
            }
        }
    }
}
