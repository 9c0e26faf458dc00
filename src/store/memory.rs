use actix_web::web::Bytes;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{BlobStore, StoreError, TaskChanges, TaskFilter, TaskStore, UpdateOutcome, UserStore};
use crate::models::{TaskRecord, User};

/// In-process store with the same observable semantics as `MongoStore`:
/// unique usernames, store-assigned ObjectIds, insertion-order iteration.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    tasks: RwLock<Vec<TaskRecord>>,
    blobs: RwLock<HashMap<ObjectId, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(StoreError::DuplicateKey(format!(
                "username {:?} already exists",
                user.username
            )));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, record: &TaskRecord) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        let mut stored = record.clone();
        stored.id = Some(id);
        self.tasks.write().await.push(stored);
        Ok(id)
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskRecord>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }

    async fn update_task(
        &self,
        filter: &TaskFilter,
        changes: &TaskChanges,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut tasks = self.tasks.write().await;
        match tasks.iter_mut().find(|task| filter.matches(task)) {
            Some(task) => Ok(UpdateOutcome {
                matched: 1,
                modified: u64::from(changes.apply(task)),
            }),
            None => Ok(UpdateOutcome::default()),
        }
    }

    async fn delete_task(&self, filter: &TaskFilter) -> Result<u64, StoreError> {
        let mut tasks = self.tasks.write().await;
        match tasks.iter().position(|task| filter.matches(task)) {
            Some(index) => {
                tasks.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn put_blob(&self, _filename: &str, content: Bytes) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        self.blobs.write().await.insert(id, content);
        Ok(id)
    }

    async fn get_blob(&self, id: ObjectId) -> Result<Option<Bytes>, StoreError> {
        Ok(self.blobs.read().await.get(&id).cloned())
    }
}
