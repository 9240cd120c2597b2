use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tubely_core::models::Video;

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::ThumbnailUploadService;
use crate::state::AppState;
use crate::utils::upload::{extract_thumbnail, multipart_or_malformed, UploadLimits};
use crate::utils::video_id::VideoId;

/// Upload thumbnail handler
///
/// Replaces the thumbnail of a video owned by the caller. The image is sent as the
/// `thumbnail` field of a multipart form and must be declared `image/png` or `image/jpeg`.
///
/// Extractor order is the pipeline order: the path id is parsed first, then the bearer token
/// is verified, and only then is the multipart body touched.
///
/// # Errors
/// - `AppError::InvalidIdentifier` - `videoID` is not a UUID
/// - `AppError::Unauthenticated` - Missing, malformed, expired or foreign token
/// - `AppError::MalformedRequest` - Body is not multipart or has no `thumbnail` field
/// - `AppError::InvalidMediaType` / `AppError::UnsupportedMediaType` - Bad declared type
/// - `AppError::PayloadTooLarge` - Thumbnail exceeds `MAX_UPLOAD_BYTES`
/// - `AppError::RecordNotFound` - No such video (500, like any other store failure)
/// - `AppError::Forbidden` - Caller does not own the video
/// - `AppError::StorageWriteError` / `AppError::StoreUnavailable` - Backend failure
#[utoipa::path(
    post,
    path = "/api/thumbnail_upload/{videoID}",
    tag = "thumbnails",
    params(
        ("videoID" = String, Path, description = "Video UUID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail stored and video updated", body = Video),
        (status = 400, description = "Invalid id, form or media type", body = ErrorResponse),
        (status = 401, description = "Invalid or missing bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 413, description = "Thumbnail too large", body = ErrorResponse),
        (status = 500, description = "Video not found, or record store or storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(
        video_id = %video_id,
        user_id = %user.subject,
        operation = "upload_thumbnail"
    )
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    VideoId(video_id): VideoId,
    user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    let multipart = multipart_or_malformed(multipart)?;

    let limits = UploadLimits {
        max_upload_bytes: state.config.max_upload_bytes,
        max_memory_bytes: state.config.max_memory_bytes,
    };
    let upload = extract_thumbnail(multipart, limits).await?;

    tracing::debug!(
        file_name = ?upload.file_name,
        media_type = %upload.media_type,
        "Thumbnail extracted"
    );

    let video = ThumbnailUploadService::new(&state)
        .upload(video_id, &user.subject, upload)
        .await?;

    Ok(Json(video))
}
