//! Attachment storage on top of a `BlobStore`.

use actix_web::web::Bytes;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::store::{BlobStore, StoreError};

/// Identifier that always resolves to the bundled placeholder image.
pub const DEFAULT_FILE_ID: &str = "default";
pub const DEFAULT_IMAGE_NAME: &str = "default.png";
static DEFAULT_IMAGE: &[u8] = include_bytes!("../assets/default.png");

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("File not found")]
    NotFound,
    #[error("Invalid file ID: {0:?}")]
    InvalidId(String),
    #[error("File exceeds the {0} byte upload limit")]
    TooLarge(usize),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parses a hex blob identifier as received in a URL path.
pub fn parse_file_id(file_id: &str) -> Result<ObjectId, FileError> {
    ObjectId::parse_str(file_id).map_err(|_| FileError::InvalidId(file_id.to_string()))
}

/// Blob content ready to be sent back to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub content: Bytes,
    pub content_type: &'static str,
}

#[derive(Clone)]
pub struct FileStore {
    blobs: Arc<dyn BlobStore>,
    max_bytes: usize,
    default_blob: Arc<OnceCell<ObjectId>>,
}

impl FileStore {
    pub fn new(blobs: Arc<dyn BlobStore>, max_bytes: usize) -> Self {
        Self {
            blobs,
            max_bytes,
            default_blob: Arc::new(OnceCell::new()),
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Stores `content` and returns the new blob identifier.
    pub async fn upload(&self, name: &str, content: Bytes) -> Result<ObjectId, FileError> {
        if content.len() > self.max_bytes {
            return Err(FileError::TooLarge(self.max_bytes));
        }
        let id = self.blobs.put_blob(name, content).await?;
        log::debug!("Stored blob {} ({})", id, name);
        Ok(id)
    }

    /// Stores a fresh copy of the bundled placeholder image.
    pub async fn upload_default(&self) -> Result<ObjectId, FileError> {
        self.upload(DEFAULT_IMAGE_NAME, Bytes::from_static(DEFAULT_IMAGE))
            .await
    }

    /// Blob identifier of the placeholder image, uploading it on first use only.
    pub async fn default_blob_id(&self) -> Result<ObjectId, FileError> {
        self.default_blob
            .get_or_try_init(|| self.upload_default())
            .await
            .copied()
    }

    /// Whether `file_id` names the placeholder image, either by sentinel or by its cached blob.
    pub fn is_default(&self, file_id: &str) -> bool {
        file_id == DEFAULT_FILE_ID
            || self
                .default_blob
                .get()
                .map_or(false, |id| id.to_hex() == file_id)
    }

    pub async fn retrieve(&self, file_id: &str) -> Result<StoredFile, FileError> {
        let content = if file_id == DEFAULT_FILE_ID {
            Bytes::from_static(DEFAULT_IMAGE)
        } else {
            let id = parse_file_id(file_id)?;
            self.blobs.get_blob(id).await?.ok_or(FileError::NotFound)?
        };

        Ok(StoredFile {
            content_type: sniff_content_type(&content),
            content,
        })
    }
}

/// Picks a response content type from the leading magic bytes of an image.
pub fn sniff_content_type(content: &[u8]) -> &'static str {
    match content {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "application/octet-stream",
    }
}
