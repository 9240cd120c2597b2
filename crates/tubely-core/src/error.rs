//! Error types module
//!
//! All failures of the thumbnail pipeline are unified under [`AppError`]. Each variant is
//! one terminal failure kind; [`ErrorMetadata`] describes how it is presented over HTTP,
//! including whether the underlying detail may be shown to the caller.
//!
//! `From<sqlx::Error>` is gated behind the `sqlx` feature.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for rejected callers
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "RECORD_NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (never contains the underlying detail)
    fn client_message(&self) -> String;

    /// Whether the underlying detail must be withheld from the response body
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid media type: {0}")]
    InvalidMediaType(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Storage write error: {0}")]
    StorageWriteError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidIdentifier(err.to_string())
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidIdentifier(_) => (
            400,
            "INVALID_IDENTIFIER",
            false,
            Some("Use a UUID video identifier"),
            true,
            LogLevel::Debug,
        ),
        AppError::Unauthenticated(_) => (
            401,
            "UNAUTHENTICATED",
            false,
            Some("Send a valid, unexpired bearer token"),
            true,
            LogLevel::Debug,
        ),
        AppError::MalformedRequest(_) => (
            400,
            "MALFORMED_REQUEST",
            false,
            Some("Send multipart/form-data with a 'thumbnail' file field"),
            true,
            LogLevel::Debug,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check the request body against the API documentation"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidMediaType(_) => (
            400,
            "INVALID_MEDIA_TYPE",
            false,
            Some("Set a valid Content-Type on the 'thumbnail' part"),
            true,
            LogLevel::Debug,
        ),
        AppError::UnsupportedMediaType(_) => (
            400,
            "UNSUPPORTED_MEDIA_TYPE",
            false,
            Some("Upload an image/png or image/jpeg thumbnail"),
            true,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce the thumbnail file size"),
            true,
            LogLevel::Debug,
        ),
        AppError::Forbidden(_) => (
            403,
            "FORBIDDEN",
            false,
            None,
            true,
            LogLevel::Warn,
        ),
        AppError::RecordNotFound(_) => (
            500,
            "RECORD_NOT_FOUND",
            false,
            Some("Verify the video ID exists"),
            false,
            LogLevel::Warn,
        ),
        AppError::StoreUnavailable(_) => (
            500,
            "STORE_UNAVAILABLE",
            true,
            Some("Retry after a short delay"),
            false,
            LogLevel::Error,
        ),
        AppError::StorageWriteError(_) => (
            500,
            "STORAGE_WRITE_ERROR",
            true,
            Some("Retry after a short delay"),
            false,
            LogLevel::Error,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidIdentifier(_) => "Invalid ID".to_string(),
            AppError::Unauthenticated(_) => "Couldn't validate JWT".to_string(),
            AppError::MalformedRequest(_) => "Unable to parse form file".to_string(),
            AppError::InvalidInput(_) => "Invalid request body".to_string(),
            AppError::InvalidMediaType(_) => "Invalid Content-Type".to_string(),
            AppError::UnsupportedMediaType(_) => "Wrong media type".to_string(),
            AppError::PayloadTooLarge(_) => "Thumbnail too large".to_string(),
            AppError::Forbidden(_) => "Not the owner of this video".to_string(),
            AppError::RecordNotFound(_) => "Could not retrieve video".to_string(),
            AppError::StoreUnavailable(_) => "Video store unavailable".to_string(),
            AppError::StorageWriteError(_) => "Could not store thumbnail".to_string(),
            AppError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }
}

impl AppError {
    /// Variant name, used as `error_type` in logs and non-sensitive responses.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidIdentifier(_) => "InvalidIdentifier",
            AppError::Unauthenticated(_) => "Unauthenticated",
            AppError::MalformedRequest(_) => "MalformedRequest",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::InvalidMediaType(_) => "InvalidMediaType",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Forbidden(_) => "Forbidden",
            AppError::RecordNotFound(_) => "RecordNotFound",
            AppError::StoreUnavailable(_) => "StoreUnavailable",
            AppError::StorageWriteError(_) => "StorageWriteError",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Underlying detail, as logged and as shown in non-sensitive responses.
    pub fn detailed_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_failure_kind() {
        let cases = [
            (AppError::InvalidIdentifier("x".into()), 400),
            (AppError::Unauthenticated("x".into()), 401),
            (AppError::MalformedRequest("x".into()), 400),
            (AppError::InvalidInput("x".into()), 400),
            (AppError::InvalidMediaType("x".into()), 400),
            (AppError::UnsupportedMediaType("x".into()), 400),
            (AppError::PayloadTooLarge("x".into()), 413),
            (AppError::Forbidden("x".into()), 403),
            (AppError::RecordNotFound("x".into()), 500),
            (AppError::StoreUnavailable("x".into()), 500),
            (AppError::StorageWriteError("x".into()), 500),
            (AppError::Internal("x".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.http_status_code(), status, "{}", err.error_type());
        }
    }

    #[test]
    fn only_store_and_storage_failures_expose_detail() {
        assert!(!AppError::RecordNotFound("x".into()).is_sensitive());
        assert!(!AppError::StoreUnavailable("x".into()).is_sensitive());
        assert!(!AppError::StorageWriteError("x".into()).is_sensitive());

        assert!(AppError::Unauthenticated("bad signature".into()).is_sensitive());
        assert!(AppError::InvalidMediaType("x".into()).is_sensitive());
        assert!(AppError::MalformedRequest("x".into()).is_sensitive());
        assert!(AppError::Internal("x".into()).is_sensitive());
    }

    #[test]
    fn client_message_never_carries_detail() {
        let err = AppError::Unauthenticated("InvalidSignature".into());
        assert!(!err.client_message().contains("InvalidSignature"));
        assert!(err.detailed_message().contains("InvalidSignature"));
    }

    #[test]
    fn uuid_parse_failure_is_invalid_identifier() {
        let err: AppError = uuid::Uuid::parse_str("not-a-uuid").unwrap_err().into();
        assert!(matches!(err, AppError::InvalidIdentifier(_)));
    }
}
