//! Storage seam between the domain layer and the document database.
//!
//! Three traits cover the three kinds of data the service keeps: accounts,
//! task records and uploaded blobs. `MongoStore` implements them against
//! MongoDB collections and a GridFS bucket; `MemoryStore` keeps everything in
//! process and backs the test suite and `STORE_BACKEND=memory`.

pub mod filter;
pub mod memory;
pub mod mongo;

use actix_web::web::Bytes;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::{TaskRecord, User};

pub use filter::{TaskChanges, TaskFilter, UpdateOutcome};
pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("store failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new account. Fails with `DuplicateKey` if the username exists.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists a record and returns the identifier the store assigned to it.
    async fn insert_task(&self, record: &TaskRecord) -> Result<ObjectId, StoreError>;

    /// Returns every matching record in store iteration order.
    async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskRecord>, StoreError>;

    /// Applies `changes` to the first record matching `filter`.
    async fn update_task(
        &self,
        filter: &TaskFilter,
        changes: &TaskChanges,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Deletes the first record matching `filter`, returning how many were removed.
    async fn delete_task(&self, filter: &TaskFilter) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put_blob(&self, filename: &str, content: Bytes) -> Result<ObjectId, StoreError>;

    /// Returns `None` when no blob has the identifier.
    async fn get_blob(&self, id: ObjectId) -> Result<Option<Bytes>, StoreError>;
}
