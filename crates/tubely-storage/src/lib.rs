//! Tubely Storage Library
//!
//! This crate provides the asset storage abstraction and its local filesystem
//! implementation.
//!
//! # Storage key format
//!
//! A thumbnail is stored under `{video_id}.{extension}` directly inside the asset root,
//! where the extension is the subtype of its media type (`png`, `jpeg`). Keys must not
//! contain `..` or a leading `/`. Key generation lives in the `keys` module so the writer
//! and the stale-artifact cleanup agree on it.

pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use keys::{parse_thumbnail_key, thumbnail_key};
pub use local::LocalStorage;
pub use traits::{AssetReader, Storage, StorageError, StorageResult};
