use actix_web::web::Bytes;
use async_trait::async_trait;
use futures::io::{AsyncReadExt, AsyncWriteExt};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson},
    error::{Error as MongoError, ErrorKind, GridFsErrorKind, WriteFailure},
    gridfs::GridFsBucket,
    options::{ClientOptions, IndexOptions},
    Client, Collection, IndexModel,
};

use super::{BlobStore, StoreError, TaskChanges, TaskFilter, TaskStore, UpdateOutcome, UserStore};
use crate::config::Config;
use crate::models::{TaskRecord, User};

const USERS_COLLECTION: &str = "users";
const TASKS_COLLECTION: &str = "task_management_data";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB backend: two collections plus the default GridFS bucket of one database.
///
/// The driver's `Client` pools connections internally and is safe to share, so a
/// single `MongoStore` is built at startup and handed to every worker.
#[derive(Clone)]
pub struct MongoStore {
    users: Collection<User>,
    tasks: Collection<TaskRecord>,
    bucket: GridFsBucket,
}

impl MongoStore {
    /// Connects, verifies the server answers, and ensures the username index exists.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&config.mongo_uri).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);

        let client = Client::with_options(options)?;
        let database = client.database(&config.database_name);
        database.run_command(doc! { "ping": 1 }).await?;
        log::info!("Connected to MongoDB database {}", config.database_name);

        let store = Self {
            users: database.collection(USERS_COLLECTION),
            tasks: database.collection(TASKS_COLLECTION),
            bucket: database.gridfs_bucket(None),
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_username = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users
            .create_index(unique_username)
            .await
            .map_err(|e| username_index_failure(e.into()))?;

        let by_owner = IndexModel::builder().keys(doc! { "userId": 1 }).build();
        self.tasks.create_index(by_owner).await?;
        Ok(())
    }
}

impl From<MongoError> for StoreError {
    fn from(error: MongoError) -> Self {
        match error.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error))
                if write_error.code == DUPLICATE_KEY_CODE =>
            {
                StoreError::DuplicateKey(write_error.message.clone())
            }
            ErrorKind::Command(command_error) if command_error.code == DUPLICATE_KEY_CODE => {
                StoreError::DuplicateKey(command_error.message.clone())
            }
            _ => StoreError::Backend(error.to_string()),
        }
    }
}

/// Explains a failed unique-username index build, which means the `users`
/// collection already holds the same username more than once.
fn username_index_failure(error: StoreError) -> StoreError {
    match error {
        StoreError::DuplicateKey(detail) => {
            log::error!(
                "Cannot create the unique username index: the {} collection contains duplicate usernames ({}). \
                 Remove or rename the duplicates and restart.",
                USERS_COLLECTION,
                detail
            );
            StoreError::Backend(format!(
                "duplicate usernames in {} prevent the unique index: {}",
                USERS_COLLECTION, detail
            ))
        }
        other => other,
    }
}

fn is_missing_file(error: &MongoError) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::GridFs(GridFsErrorKind::FileNotFound { .. })
    )
}

#[async_trait]
impl UserStore for MongoStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.users.insert_one(user).await?;
        Ok(())
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.find_one(doc! { "username": username }).await?)
    }
}

#[async_trait]
impl TaskStore for MongoStore {
    async fn insert_task(&self, record: &TaskRecord) -> Result<ObjectId, StoreError> {
        let result = self.tasks.insert_one(record).await?;
        result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::Backend(format!(
                "unexpected inserted id type: {}",
                result.inserted_id
            ))
        })
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskRecord>, StoreError> {
        let cursor = self.tasks.find(filter.to_document()).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_task(
        &self,
        filter: &TaskFilter,
        changes: &TaskChanges,
    ) -> Result<UpdateOutcome, StoreError> {
        let result = self
            .tasks
            .update_one(filter.to_document(), changes.to_update_document())
            .await?;
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_task(&self, filter: &TaskFilter) -> Result<u64, StoreError> {
        let result = self.tasks.delete_one(filter.to_document()).await?;
        Ok(result.deleted_count)
    }
}

#[async_trait]
impl BlobStore for MongoStore {
    async fn put_blob(&self, filename: &str, content: Bytes) -> Result<ObjectId, StoreError> {
        let mut upload = self.bucket.open_upload_stream(filename).await?;
        // The upload stream splits the payload into GridFS chunks as it is written.
        upload
            .write_all(&content)
            .await
            .map_err(|e| StoreError::Backend(format!("GridFS write failed: {}", e)))?;
        upload
            .close()
            .await
            .map_err(|e| StoreError::Backend(format!("GridFS close failed: {}", e)))?;

        match upload.id() {
            Bson::ObjectId(id) => Ok(*id),
            other => Err(StoreError::Backend(format!(
                "unexpected GridFS file id type: {}",
                other
            ))),
        }
    }

    async fn get_blob(&self, id: ObjectId) -> Result<Option<Bytes>, StoreError> {
        let mut download = match self.bucket.open_download_stream(Bson::ObjectId(id)).await {
            Ok(download) => download,
            Err(error) if is_missing_file(&error) => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let mut content = Vec::new();
        download
            .read_to_end(&mut content)
            .await
            .map_err(|e| StoreError::Backend(format!("GridFS read failed: {}", e)))?;
        Ok(Some(Bytes::from(content)))
    }
}
