//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all storage backends must
//! implement, along with the error and metadata types shared by backends.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Stream of object payload chunks.
pub type ObjectStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// An object as seen in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageObject {
    pub key: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub tag: Option<String>,
}

/// Metadata of a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectStat {
    pub content_type: String,
    pub size: u64,
    pub tag: String,
    pub modified: DateTime<Utc>,
}

/// Storage abstraction trait
///
/// All storage backends must implement this trait so the orchestration layer
/// can work against S3-compatible storage in production and an in-memory map
/// in tests without coupling to either.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// List objects directly under a prefix (non-recursive).
    async fn list(&self, prefix: &str) -> StorageResult<Vec<StorageObject>>;

    /// Get the metadata of an object without touching its payload.
    async fn stat(&self, key: &str) -> StorageResult<ObjectStat>;

    /// Get an object's metadata and a stream of its payload.
    ///
    /// The stream yields `Bytes` chunks as they arrive; the payload is never
    /// buffered in full.
    async fn get(&self, key: &str) -> StorageResult<(ObjectStat, ObjectStream)>;

    /// Write an object from a reader, replacing any existing object.
    ///
    /// `content_length` is a hint only; the reader is consumed until EOF
    /// either way.
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<()>;

    /// Delete an object.
    ///
    /// Deleting an absent key is an error (`StorageError::NotFound`), not a
    /// no-op, so callers can tell removal apart from never-existed.
    async fn delete(&self, key: &str) -> StorageResult<()>;
}
