use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tubely_core::models::{CreateVideoRequest, Video};
use tubely_core::AppError;

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::video_id::VideoId;

const MAX_TITLE_LEN: usize = 200;

#[utoipa::path(
    get,
    path = "/api/videos/{videoID}",
    tag = "videos",
    params(
        ("videoID" = String, Path, description = "Video UUID")
    ),
    responses(
        (status = 200, description = "Video found", body = Video),
        (status = 400, description = "Invalid video id", body = ErrorResponse),
        (status = 500, description = "Video not found or record store unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(video_id = %video_id))]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    VideoId(video_id): VideoId,
) -> Result<Json<Video>, HttpAppError> {
    let video = state.videos.fetch(video_id).await?;
    Ok(Json(video))
}

/// Create a draft video owned by the caller, with no thumbnail or video file yet.
#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Draft video created", body = Video),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Invalid or missing bearer token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %user.subject))]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> Result<(StatusCode, Json<Video>), HttpAppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("title cannot be empty".to_string()).into());
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::InvalidInput(format!(
            "title cannot be longer than {} characters",
            MAX_TITLE_LEN
        ))
        .into());
    }

    let draft = Video::draft(user.subject, title, request.description);
    let video = state.videos.create(&draft).await?;

    tracing::info!(video_id = %video.id, "Draft video created");
    Ok((StatusCode::CREATED, Json(video)))
}
