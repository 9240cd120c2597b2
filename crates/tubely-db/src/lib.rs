//! Tubely DB Library
//!
//! Record store gateway for video records: the [`VideoRepository`] trait plus a Postgres
//! backend and an in-process backend.

pub mod db;

pub use db::{InMemoryVideoRepository, PgVideoRepository, VideoRepository};
