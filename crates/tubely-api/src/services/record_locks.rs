//! In-process locks keyed by video id.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, Weak};

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

type LockTable = HashMap<Uuid, Weak<Mutex<()>>>;

/// One async mutex per video id, created on demand.
///
/// The table only holds weak references; an entry is removed as soon as the last holder or
/// waiter for that id is gone.
#[derive(Clone, Default)]
pub struct RecordLocks {
    table: Arc<StdMutex<LockTable>>,
}

impl RecordLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other request holds the lock for `video_id`.
    pub async fn acquire(&self, video_id: Uuid) -> RecordLockGuard {
        let lock = {
            let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
            match table.get(&video_id).and_then(Weak::upgrade) {
                Some(lock) => lock,
                None => {
                    let lock = Arc::new(Mutex::new(()));
                    table.insert(video_id, Arc::downgrade(&lock));
                    lock
                }
            }
        };

        RecordLockGuard {
            video_id,
            guard: Some(lock.lock_owned().await),
            table: self.table.clone(),
        }
    }

    /// Number of ids that currently have a live lock.
    pub fn len(&self) -> usize {
        self.table.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct RecordLockGuard {
    video_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
    table: Arc<StdMutex<LockTable>>,
}

impl Drop for RecordLockGuard {
    fn drop(&mut self) {
        // Release the mutex (and its Arc) before checking for other holders.
        drop(self.guard.take());

        let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        if table
            .get(&self.video_id)
            .is_some_and(|lock| lock.strong_count() == 0)
        {
            table.remove(&self.video_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn entry_is_dropped_after_release() {
        let locks = RecordLocks::new();
        let id = Uuid::new_v4();

        let guard = locks.acquire(id).await;
        assert_eq!(locks.len(), 1);
        drop(guard);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn same_id_is_serialized() {
        let locks = RecordLocks::new();
        let id = Uuid::new_v4();

        let guard = locks.acquire(id).await;
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(id).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should get the lock")
            .unwrap();
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn different_ids_do_not_block() {
        let locks = RecordLocks::new();
        let _first = locks.acquire(Uuid::new_v4()).await;

        tokio::time::timeout(Duration::from_secs(1), locks.acquire(Uuid::new_v4()))
            .await
            .expect("unrelated id must not wait");
    }
}
