//! Shared key generation for thumbnails.
//!
//! Key format: `{video_id}.{extension}`.

use tubely_core::ThumbnailMediaType;
use uuid::Uuid;

/// Storage key for the thumbnail of `video_id` with the given media type.
pub fn thumbnail_key(video_id: Uuid, media_type: ThumbnailMediaType) -> String {
    format!("{}.{}", video_id, media_type.extension())
}

/// Inverse of [`thumbnail_key`]; `None` for anything that is not a thumbnail key.
pub fn parse_thumbnail_key(key: &str) -> Option<(Uuid, ThumbnailMediaType)> {
    let (id, extension) = key.rsplit_once('.')?;
    let video_id = Uuid::parse_str(id).ok()?;
    let media_type = ThumbnailMediaType::from_extension(extension)?;
    Some((video_id, media_type))
}
