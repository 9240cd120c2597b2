//! Thumbnail upload service
//!
//! Runs the record-side half of an upload once the payload has been extracted:
//! fetch → authorize → write asset → update reference → persist → drop stale asset.

use std::sync::Arc;

use tubely_core::models::Video;
use tubely_core::AppError;
use tubely_db::VideoRepository;
use tubely_storage::{parse_thumbnail_key, thumbnail_key, Storage};
use uuid::Uuid;

use crate::error::storage_error_to_app_error;
use crate::services::RecordLocks;
use crate::state::AppState;
use crate::utils::upload::ThumbnailUpload;

pub struct ThumbnailUploadService {
    videos: Arc<dyn VideoRepository>,
    storage: Arc<dyn Storage>,
    locks: RecordLocks,
    assets_base_url: String,
}

impl ThumbnailUploadService {
    pub fn new(state: &AppState) -> Self {
        Self {
            videos: state.videos.clone(),
            storage: state.storage.clone(),
            locks: state.thumbnail_locks.clone(),
            assets_base_url: state.config.assets_base_url(),
        }
    }

    /// Attach `upload` as the thumbnail of `video_id` on behalf of `subject`.
    ///
    /// Holds the per-video lock from the fetch until the new reference is persisted, so two
    /// uploads for the same video never interleave their write and update.
    #[tracing::instrument(
        skip(self, upload),
        fields(video_id = %video_id, user_id = %subject, media_type = %upload.media_type)
    )]
    pub async fn upload(
        &self,
        video_id: Uuid,
        subject: &str,
        upload: ThumbnailUpload,
    ) -> Result<Video, AppError> {
        let _lock = self.locks.acquire(video_id).await;

        let mut video = self.videos.fetch(video_id).await?;
        authorize_owner(&video, subject)?;

        tracing::info!(
            size_bytes = upload.payload.len(),
            "Uploading thumbnail for video"
        );

        let storage_key = self.write_asset(video_id, upload).await?;

        let previous = video.thumbnail_url.replace(self.asset_url(&storage_key));
        let video = self.videos.persist(&video).await?;

        if let Some(previous) = previous {
            self.remove_stale_asset(video_id, &previous, &storage_key)
                .await;
        }

        tracing::info!(
            storage_key = %storage_key,
            thumbnail_url = ?video.thumbnail_url,
            "Thumbnail updated"
        );

        Ok(video)
    }

    async fn write_asset(&self, video_id: Uuid, upload: ThumbnailUpload) -> Result<String, AppError> {
        let storage_key = thumbnail_key(video_id, upload.media_type);
        let reader = upload.payload.into_reader().await?;

        self.storage
            .put_stream(&storage_key, reader)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, storage_key = %storage_key, "Failed to write thumbnail");
                storage_error_to_app_error(e)
            })?;

        Ok(storage_key)
    }

    fn asset_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.assets_base_url, storage_key)
    }

    /// Storage key behind `url` if it names one of this video's thumbnails in our namespace.
    fn owned_thumbnail_key(&self, video_id: Uuid, url: &str) -> Option<String> {
        let key = url
            .strip_prefix(self.assets_base_url.as_str())?
            .strip_prefix('/')?;
        let (id, _) = parse_thumbnail_key(key)?;
        (id == video_id).then(|| key.to_string())
    }

    /// Best effort: a failure here is logged and never fails the upload.
    async fn remove_stale_asset(&self, video_id: Uuid, previous_url: &str, current_key: &str) {
        let Some(stale_key) = self.owned_thumbnail_key(video_id, previous_url) else {
            return;
        };
        if stale_key == current_key {
            return;
        }

        match self.storage.delete(&stale_key).await {
            Ok(()) => tracing::debug!(storage_key = %stale_key, "Removed previous thumbnail"),
            Err(e) => tracing::warn!(
                error = %e,
                storage_key = %stale_key,
                "Failed to remove previous thumbnail"
            ),
        }
    }
}

/// The verified subject must be the video's owner.
pub fn authorize_owner(video: &Video, subject: &str) -> Result<(), AppError> {
    if video.is_owned_by(subject) {
        Ok(())
    } else {
        tracing::warn!(video_id = %video.id, user_id = %subject, "Thumbnail upload by non-owner rejected");
        Err(AppError::Forbidden(format!(
            "{} does not own video {}",
            subject, video.id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_owner_is_authorized() {
        let video = Video::draft("u1", "Boots", "");
        assert!(authorize_owner(&video, "u1").is_ok());
        assert!(matches!(
            authorize_owner(&video, "u2"),
            Err(AppError::Forbidden(_))
        ));
        assert!(authorize_owner(&video, "").is_err());
    }
}
