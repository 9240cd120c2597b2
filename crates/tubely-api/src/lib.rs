//! Tubely API Library
//!
//! HTTP surface of the thumbnail service: authentication, multipart extraction, the upload
//! service, routes and application setup.

mod api_doc;
mod handlers;
mod middleware;
mod telemetry;
mod utils;

pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
