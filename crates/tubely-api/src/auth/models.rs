use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};

use crate::auth::jwt::{bearer_token, validate_access_token};
use crate::error::HttpAppError;
use crate::state::AppState;

/// The verified caller of a request.
///
/// Extracting it validates the bearer token, so a handler that takes `AuthUser` before its
/// body extractor never touches the body of an unauthenticated request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub subject: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        let token = bearer_token(header)?;
        let subject =
            validate_access_token(token, &state.config.jwt_secret, &state.config.jwt_issuer)?;

        Ok(AuthUser { subject })
    }
}
