//! Storage abstraction trait
//!
//! This module defines the Storage trait that asset backends implement.

use async_trait::async_trait;
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

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Owned byte source handed to [`Storage::put_stream`].
pub type AssetReader = Pin<Box<dyn AsyncRead + Send + Unpin>>;

/// Storage abstraction trait
///
/// Keys are relative to the backend's root. See the crate root documentation for the
/// thumbnail key layout.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stream `reader` to `storage_key` until EOF, replacing any existing object.
    ///
    /// The replacement is all-or-nothing for readers: either the previous object or the
    /// complete new one is visible, never a partial write. Returns the number of bytes written.
    async fn put_stream(&self, storage_key: &str, reader: AssetReader) -> StorageResult<u64>;

    /// Download an object by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object by its storage key. Deleting a missing object is not an error.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Verify the backend can currently accept writes.
    async fn health_check(&self) -> StorageResult<()>;
}
