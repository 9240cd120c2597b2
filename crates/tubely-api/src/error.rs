//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Any `AppError` converts into it with `?`, and
//! it renders the status, body and log line the error's [`ErrorMetadata`] asks for.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use tubely_core::{AppError, ErrorMetadata, LogLevel};
use tubely_storage::StorageError;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Underlying failure text; only present for record store and storage failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    fn from_app_error(error: &AppError) -> Self {
        let (details, error_type) = if error.is_sensitive() {
            (None, None)
        } else {
            (
                Some(error.detailed_message()),
                Some(error.error_type().to_string()),
            )
        };

        ErrorResponse {
            error: error.client_message(),
            details,
            error_type,
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(String::from),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: `IntoResponse` and `AppError` both live in other crates)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(storage_error_to_app_error(err))
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that rejects with our ErrorResponse format (400 + JSON).
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

/// Every storage failure on the write path surfaces as a storage write error.
pub fn storage_error_to_app_error(err: StorageError) -> AppError {
    match err {
        StorageError::InvalidKey(msg) => AppError::Internal(format!("invalid storage key: {}", msg)),
        other => AppError::StorageWriteError(other.to_string()),
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let detail = error.detailed_message();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %detail, error_type = error_type, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %detail, error_type = error_type, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %detail, error_type = error_type, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(ErrorResponse::from_app_error(app_error))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_failures_hide_details() {
        let body = ErrorResponse::from_app_error(&AppError::Unauthenticated(
            "InvalidSignature".to_string(),
        ));
        assert_eq!(body.error, "Couldn't validate JWT");
        assert_eq!(body.code, "UNAUTHENTICATED");
        assert!(body.details.is_none());
        assert!(body.error_type.is_none());
    }

    #[test]
    fn storage_failures_show_details() {
        let body = ErrorResponse::from_app_error(&AppError::StorageWriteError(
            "disk full".to_string(),
        ));
        assert_eq!(body.error, "Could not store thumbnail");
        assert!(body.details.unwrap().contains("disk full"));
        assert!(body.recoverable);
    }

    #[test]
    fn status_comes_from_metadata() {
        let response = HttpAppError(AppError::Forbidden("u2".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = HttpAppError(AppError::PayloadTooLarge("big".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn storage_upload_failure_maps_to_write_error() {
        let err = storage_error_to_app_error(StorageError::UploadFailed("EIO".to_string()));
        assert!(matches!(err, AppError::StorageWriteError(_)));
    }
}
