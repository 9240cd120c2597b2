use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tubely_core::models::Video;
use tubely_core::AppError;
use uuid::Uuid;

/// Record store gateway for videos.
///
/// Reads and writes always move the complete record; there are no partial-field updates.
/// Errors are already mapped to the pipeline taxonomy: a missing record is
/// `AppError::RecordNotFound`, any backend failure is `AppError::StoreUnavailable`.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Fetch one video by id.
    async fn fetch(&self, id: Uuid) -> Result<Video, AppError>;

    /// Write `video` back in place and return the stored row.
    ///
    /// The owner is never rewritten and `updated_at` is set by the store.
    async fn persist(&self, video: &Video) -> Result<Video, AppError>;

    /// Insert a new video.
    async fn create(&self, video: &Video) -> Result<Video, AppError>;

    /// Cheap round trip to the backend.
    async fn health_check(&self) -> Result<(), AppError>;
}

/// Postgres-backed video repository
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, id: Uuid) -> Result<Video, AppError> {
        let video: Option<Video> =
            sqlx::query_as::<Postgres, Video>("SELECT * FROM videos WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        video.ok_or_else(|| AppError::RecordNotFound(format!("video {} does not exist", id)))
    }

    #[tracing::instrument(skip(self, video), fields(video_id = %video.id))]
    async fn persist(&self, video: &Video) -> Result<Video, AppError> {
        let stored: Option<Video> = sqlx::query_as::<Postgres, Video>(
            r#"
            UPDATE videos
            SET title = $2,
                description = $3,
                thumbnail_url = $4,
                video_url = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .fetch_optional(&self.pool)
        .await?;

        stored.ok_or_else(|| {
            AppError::RecordNotFound(format!("video {} was removed before update", video.id))
        })
    }

    #[tracing::instrument(skip(self, video), fields(video_id = %video.id))]
    async fn create(&self, video: &Video) -> Result<Video, AppError> {
        let stored = sqlx::query_as::<Postgres, Video>(
            r#"
            INSERT INTO videos (
                id, user_id, title, description,
                thumbnail_url, video_url, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(video.id)
        .bind(&video.user_id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.created_at)
        .bind(video.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
