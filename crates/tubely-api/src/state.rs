//! Application state shared by every handler.

use std::sync::Arc;

use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_storage::Storage;

use crate::services::RecordLocks;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn Storage>,
    /// Serializes thumbnail replacement per video.
    pub thumbnail_locks: RecordLocks,
}

impl AppState {
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoRepository>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            config,
            videos,
            storage,
            thumbnail_locks: RecordLocks::new(),
        }
    }
}
