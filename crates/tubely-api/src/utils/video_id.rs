//! `{videoID}` path segment extraction

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use tubely_core::AppError;
use uuid::Uuid;

use crate::error::HttpAppError;

/// Video id parsed from the route's single path parameter.
///
/// Rejects with `InvalidIdentifier` (400) instead of axum's plain-text path rejection.
#[derive(Debug, Clone, Copy)]
pub struct VideoId(pub Uuid);

impl<S> FromRequestParts<S> for VideoId
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidIdentifier(e.body_text()))?;

        let id = Uuid::parse_str(raw.trim()).map_err(AppError::from)?;
        Ok(VideoId(id))
    }
}
