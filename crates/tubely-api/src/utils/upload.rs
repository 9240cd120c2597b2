//! Multipart extraction for thumbnail uploads

use std::io::SeekFrom;

use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::Multipart;
use axum::http::{header::CONTENT_TYPE, StatusCode};
use bytes::{Bytes, BytesMut};
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tubely_core::{parse_media_type, AppError, ThumbnailMediaType};
use tubely_storage::AssetReader;

/// Form field carrying the image.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    /// Largest accepted payload.
    pub max_upload_bytes: usize,
    /// Payload bytes kept in memory before spilling to a temporary file.
    pub max_memory_bytes: usize,
}

/// Payload bytes, held in memory or in an anonymous temporary file.
#[derive(Debug)]
pub enum SpooledPayload {
    Memory(Bytes),
    File { file: File, len: u64 },
}

impl SpooledPayload {
    pub fn len(&self) -> u64 {
        match self {
            SpooledPayload::Memory(bytes) => bytes.len() as u64,
            SpooledPayload::File { len, .. } => *len,
        }
    }

    pub fn is_spooled(&self) -> bool {
        matches!(self, SpooledPayload::File { .. })
    }

    /// Rewind and hand the bytes out as a reader for the asset writer.
    pub async fn into_reader(self) -> Result<AssetReader, AppError> {
        match self {
            SpooledPayload::Memory(bytes) => Ok(Box::pin(std::io::Cursor::new(bytes))),
            SpooledPayload::File { mut file, .. } => {
                file.seek(SeekFrom::Start(0)).await.map_err(|e| {
                    AppError::Internal(format!("Failed to rewind spooled thumbnail: {}", e))
                })?;
                Ok(Box::pin(file))
            }
        }
    }
}

/// The `thumbnail` part of an upload form.
#[derive(Debug)]
pub struct ThumbnailUpload {
    pub media_type: ThumbnailMediaType,
    pub file_name: Option<String>,
    pub payload: SpooledPayload,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::MalformedRequest(format!("Failed to read multipart: {}", e.body_text()))
    }
}

/// Map a missing or unreadable multipart body to `MalformedRequest`.
pub fn multipart_or_malformed(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Multipart, AppError> {
    multipart.map_err(|rejection| {
        AppError::MalformedRequest(format!(
            "Expected a multipart/form-data body: {}",
            rejection.body_text()
        ))
    })
}

/// Resolve a part's declared `Content-Type` against the thumbnail allowlist.
///
/// A missing or blank type is unsupported; a type that does not parse is invalid.
pub fn thumbnail_media_type(declared: Option<&str>) -> Result<ThumbnailMediaType, AppError> {
    let declared = match declared.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => {
            return Err(AppError::UnsupportedMediaType(
                "thumbnail part has no Content-Type".to_string(),
            ))
        }
    };

    let essence = parse_media_type(declared)
        .map_err(|e| AppError::InvalidMediaType(format!("{}: {}", declared, e)))?;

    ThumbnailMediaType::from_essence(&essence).ok_or_else(|| {
        AppError::UnsupportedMediaType(format!(
            "{} is not one of {}",
            essence,
            ThumbnailMediaType::ALLOWED
                .iter()
                .map(ThumbnailMediaType::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })
}

/// Find the `thumbnail` field and buffer its bytes.
///
/// The declared media type is checked before any byte of the field body is read. Other fields
/// are skipped.
pub async fn extract_thumbnail(
    mut multipart: Multipart,
    limits: UploadLimits,
) -> Result<ThumbnailUpload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }

        let declared = match field.headers().get(CONTENT_TYPE) {
            Some(value) => Some(value.to_str().map_err(|_| {
                AppError::InvalidMediaType("Content-Type is not visible ASCII".to_string())
            })?),
            None => None,
        };
        let media_type = thumbnail_media_type(declared)?;
        let file_name = field.file_name().map(str::to_string);

        let payload = spool_field(field, limits).await?;

        tracing::debug!(
            media_type = %media_type,
            size_bytes = payload.len(),
            spooled = payload.is_spooled(),
            "Thumbnail payload received"
        );

        return Ok(ThumbnailUpload {
            media_type,
            file_name,
            payload,
        });
    }

    Err(AppError::MalformedRequest(format!(
        "No '{}' field in form",
        THUMBNAIL_FIELD
    )))
}

async fn spool_field(mut field: Field<'_>, limits: UploadLimits) -> Result<SpooledPayload, AppError> {
    let mut buffer = BytesMut::new();
    let mut spill: Option<File> = None;
    let mut total: usize = 0;

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        total += chunk.len();
        if total > limits.max_upload_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Thumbnail exceeds maximum allowed size of {} bytes",
                limits.max_upload_bytes
            )));
        }

        if spill.is_none() && total > limits.max_memory_bytes {
            let std_file = tempfile::tempfile().map_err(|e| {
                AppError::Internal(format!("Failed to create spool file: {}", e))
            })?;
            let mut file = File::from_std(std_file);
            file.write_all(&buffer)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to spool thumbnail: {}", e)))?;
            buffer.clear();
            spill = Some(file);
        }

        match spill.as_mut() {
            Some(file) => file
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to spool thumbnail: {}", e)))?,
            None => buffer.extend_from_slice(&chunk),
        }
    }

    match spill {
        Some(mut file) => {
            file.flush()
                .await
                .map_err(|e| AppError::Internal(format!("Failed to spool thumbnail: {}", e)))?;
            Ok(SpooledPayload::File {
                file,
                len: total as u64,
            })
        }
        None => Ok(SpooledPayload::Memory(buffer.freeze())),
    }
}
