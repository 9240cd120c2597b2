//! Record store and storage wrappers that count calls and can be told to fail.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tubely_core::models::Video;
use tubely_core::AppError;
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_storage::{AssetReader, LocalStorage, Storage, StorageError, StorageResult};
use uuid::Uuid;

#[derive(Default)]
pub struct CountingVideoRepository {
    inner: InMemoryVideoRepository,
    fetches: AtomicUsize,
    persists: AtomicUsize,
    fail_fetch: AtomicBool,
    fail_persist: AtomicBool,
}

impl CountingVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryVideoRepository {
        &self.inner
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn persists(&self) -> usize {
        self.persists.load(Ordering::SeqCst)
    }

    pub fn fail_fetch(&self) {
        self.fail_fetch.store(true, Ordering::SeqCst);
    }

    pub fn fail_persist(&self) {
        self.fail_persist.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VideoRepository for CountingVideoRepository {
    async fn fetch(&self, id: Uuid) -> Result<Video, AppError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable(
                "connection refused".to_string(),
            ));
        }
        self.inner.fetch(id).await
    }

    async fn persist(&self, video: &Video) -> Result<Video, AppError> {
        self.persists.fetch_add(1, Ordering::SeqCst);
        if self.fail_persist.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable(
                "connection refused".to_string(),
            ));
        }
        self.inner.persist(video).await
    }

    async fn create(&self, video: &Video) -> Result<Video, AppError> {
        self.inner.create(video).await
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.inner.health_check().await
    }
}

pub struct CountingStorage {
    inner: LocalStorage,
    puts: AtomicUsize,
    deletes: AtomicUsize,
    fail_puts: AtomicBool,
    fail_deletes: AtomicBool,
}

impl CountingStorage {
    pub fn new(inner: LocalStorage) -> Self {
        Self {
            inner,
            puts: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            fail_puts: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn fail_puts(&self) {
        self.fail_puts.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for CountingStorage {
    async fn put_stream(&self, storage_key: &str, reader: AssetReader) -> StorageResult<u64> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(
                "No space left on device".to_string(),
            ));
        }
        self.inner.put_stream(storage_key, reader).await
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.inner.download(storage_key).await
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("permission denied".to_string()));
        }
        self.inner.delete(storage_key).await
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        self.inner.exists(storage_key).await
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.inner.health_check().await
    }
}
