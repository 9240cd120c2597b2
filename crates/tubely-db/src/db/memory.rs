use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tubely_core::models::Video;
use tubely_core::AppError;
use uuid::Uuid;

use super::video::VideoRepository;

/// Process-local video repository, selected with `RECORD_STORE=memory`.
///
/// Records do not survive a restart.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<RwLock<HashMap<Uuid, Video>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing videos.
    pub async fn with_videos(videos: impl IntoIterator<Item = Video>) -> Self {
        let repo = Self::new();
        {
            let mut guard = repo.videos.write().await;
            for video in videos {
                guard.insert(video.id, video);
            }
        }
        repo
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn fetch(&self, id: Uuid) -> Result<Video, AppError> {
        self.videos
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::RecordNotFound(format!("video {} does not exist", id)))
    }

    async fn persist(&self, video: &Video) -> Result<Video, AppError> {
        let mut guard = self.videos.write().await;
        let stored = guard.get_mut(&video.id).ok_or_else(|| {
            AppError::RecordNotFound(format!("video {} was removed before update", video.id))
        })?;

        stored.title = video.title.clone();
        stored.description = video.description.clone();
        stored.thumbnail_url = video.thumbnail_url.clone();
        stored.video_url = video.video_url.clone();
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn create(&self, video: &Video) -> Result<Video, AppError> {
        let mut guard = self.videos.write().await;
        if guard.contains_key(&video.id) {
            return Err(AppError::StoreUnavailable(format!(
                "video {} already exists",
                video.id
            )));
        }
        guard.insert(video.id, video.clone());
        Ok(video.clone())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_missing_is_record_not_found() {
        let repo = InMemoryVideoRepository::new();
        let result = repo.fetch(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::RecordNotFound(_))));
    }

    #[tokio::test]
    async fn persist_replaces_fields_but_not_owner() {
        let video = Video::draft("u1", "Boots", "");
        let repo = InMemoryVideoRepository::with_videos([video.clone()]).await;

        let mut changed = video.clone();
        changed.user_id = "intruder".to_string();
        changed.thumbnail_url = Some("http://localhost:8091/assets/x.png".to_string());
        let stored = repo.persist(&changed).await.unwrap();

        assert_eq!(stored.user_id, "u1");
        assert_eq!(stored.thumbnail_url, changed.thumbnail_url);
        assert!(stored.updated_at >= video.updated_at);
        assert_eq!(repo.fetch(video.id).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn persist_missing_is_record_not_found() {
        let repo = InMemoryVideoRepository::new();
        let result = repo.persist(&Video::draft("u1", "Boots", "")).await;
        assert!(matches!(result, Err(AppError::RecordNotFound(_))));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_ids() {
        let repo = InMemoryVideoRepository::new();
        let video = Video::draft("u1", "Boots", "");
        repo.create(&video).await.unwrap();
        assert!(repo.create(&video).await.is_err());
    }
}
