//! HS256 access tokens.
//!
//! Tokens carry the caller's subject in `sub` and are only accepted when the signature
//! matches the configured secret, the issuer matches, and `exp` has not passed.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tubely_core::AppError;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AppError> {
    let header = header
        .ok_or_else(|| AppError::Unauthenticated("Missing authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| {
            AppError::Unauthenticated("Invalid authorization header format".to_string())
        })?;

    if token.is_empty() {
        return Err(AppError::Unauthenticated("Empty bearer token".to_string()));
    }

    Ok(token)
}

/// Validate `token` and return its subject.
pub fn validate_access_token(token: &str, secret: &str, issuer: &str) -> Result<String, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_issuer(&[issuer]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let token_data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::Unauthenticated("Token has expired".to_string())
            }
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                AppError::Unauthenticated("Invalid token issuer".to_string())
            }
            _ => AppError::Unauthenticated(format!("Invalid token: {}", e)),
        }
    })?;

    let subject = token_data.claims.sub;
    if subject.trim().is_empty() {
        return Err(AppError::Unauthenticated("Token has an empty subject".to_string()));
    }

    Ok(subject)
}

/// Mint a token for `subject` that expires after `ttl`.
pub fn issue_access_token(
    subject: &str,
    secret: &str,
    issuer: &str,
    ttl: Duration,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = AccessClaims {
        sub: subject.to_string(),
        iss: issuer.to_string(),
        exp: (now + ttl).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign access token: {}", e)))
}
