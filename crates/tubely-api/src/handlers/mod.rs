pub mod thumbnail_upload;
pub mod videos;
