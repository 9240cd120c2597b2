pub mod upload;
pub mod video_id;
