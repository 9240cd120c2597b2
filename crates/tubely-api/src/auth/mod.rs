pub mod jwt;
pub mod models;

pub use jwt::{bearer_token, issue_access_token, validate_access_token, AccessClaims};
pub use models::AuthUser;
