//! Tubely Core Library
//!
//! This crate provides the domain model, error taxonomy, configuration and media type
//! rules shared by every Tubely component.

pub mod config;
pub mod error;
pub mod media_type;
pub mod models;

// Re-export commonly used types
pub use config::{Config, LogFormat, RecordStoreBackend};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use media_type::{parse_media_type, MediaTypeError, ThumbnailMediaType};
