pub mod record_locks;
pub mod thumbnail;

pub use record_locks::{RecordLockGuard, RecordLocks};
pub use thumbnail::ThumbnailUploadService;
