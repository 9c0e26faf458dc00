//! Owner-scoped task operations.
//!
//! Every call takes the caller's username and folds it into the store filter,
//! so a record owned by someone else behaves exactly like a missing one.

use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::models::{TaskInput, TaskRecord, TaskStatus};
use crate::store::{StoreError, TaskChanges, TaskFilter, TaskStore};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Task not found")]
    NotFound,
    #[error("Invalid task ID: {0:?}")]
    InvalidId(String),
    #[error("Invalid task status: {0:?}")]
    InvalidStatus(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parses a hex task identifier as received in a URL path.
pub fn parse_task_id(hex: &str) -> Result<ObjectId, RepoError> {
    ObjectId::parse_str(hex).map_err(|_| RepoError::InvalidId(hex.to_string()))
}

#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<dyn TaskStore>,
}

impl TaskRepository {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Persists a new task for `owner` and returns it as stored, identifier included.
    pub async fn create(
        &self,
        owner: &str,
        input: TaskInput,
        file_id: &str,
    ) -> Result<TaskRecord, RepoError> {
        let record = TaskRecord::new(owner, input, file_id);
        let id = self.store.insert_task(&record).await?;

        let filter = TaskFilter::owned_by(owner).with_id(id);
        self.store
            .find_tasks(&filter)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                StoreError::Backend(format!("task {} missing right after insert", id)).into()
            })
    }

    /// All of `owner`'s tasks, optionally restricted to one status, in store order.
    ///
    /// An empty status string means no status filter.
    pub async fn list(
        &self,
        owner: &str,
        status: Option<&str>,
    ) -> Result<Vec<TaskRecord>, RepoError> {
        let mut filter = TaskFilter::owned_by(owner);
        if let Some(status) = status.filter(|status| !status.is_empty()) {
            filter = filter.with_status(status);
        }
        Ok(self.store.find_tasks(&filter).await?)
    }

    /// Replaces the five editable fields; the file reference changes only if `new_file_id` is given.
    pub async fn update_fields(
        &self,
        owner: &str,
        task_id: &str,
        input: TaskInput,
        new_file_id: Option<String>,
    ) -> Result<(), RepoError> {
        let id = parse_task_id(task_id)?;
        let changes = TaskChanges::Fields {
            input,
            file_id: new_file_id,
        };
        self.apply(owner, id, &changes).await
    }

    pub async fn update_status(
        &self,
        owner: &str,
        task_id: &str,
        new_status: &str,
    ) -> Result<(), RepoError> {
        let status: TaskStatus = new_status
            .parse()
            .map_err(|_| RepoError::InvalidStatus(new_status.to_string()))?;
        let id = parse_task_id(task_id)?;
        self.apply(owner, id, &TaskChanges::Status(status)).await
    }

    pub async fn delete(&self, owner: &str, task_id: &str) -> Result<(), RepoError> {
        let id = parse_task_id(task_id)?;
        let filter = TaskFilter::owned_by(owner).with_id(id);
        match self.store.delete_task(&filter).await? {
            0 => Err(RepoError::NotFound),
            _ => {
                log::info!("Deleted task {} of {}", id, owner);
                Ok(())
            }
        }
    }

    /// Whether one of `owner`'s tasks references the blob `file_id`.
    pub async fn references_file(&self, owner: &str, file_id: &str) -> Result<bool, RepoError> {
        let filter = TaskFilter::owned_by(owner).with_file(file_id);
        Ok(!self.store.find_tasks(&filter).await?.is_empty())
    }

    async fn apply(&self, owner: &str, id: ObjectId, changes: &TaskChanges) -> Result<(), RepoError> {
        let filter = TaskFilter::owned_by(owner).with_id(id);
        let outcome = self.store.update_task(&filter, changes).await?;
        if outcome.matched == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
