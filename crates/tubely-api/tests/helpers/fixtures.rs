use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;

pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];
pub const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub const RAW_BOUNDARY: &str = "tubely-test-boundary";

/// Form with a single `thumbnail` file part.
pub fn thumbnail_form(data: &[u8], mime_type: &str, file_name: &str) -> MultipartForm {
    let part = Part::bytes(data.to_vec())
        .file_name(file_name)
        .mime_type(mime_type);
    MultipartForm::new().add_part("thumbnail", part)
}

pub fn jpeg_form() -> MultipartForm {
    thumbnail_form(JPEG_BYTES, "image/jpeg", "thumb.jpg")
}

pub fn png_form() -> MultipartForm {
    thumbnail_form(PNG_BYTES, "image/png", "thumb.png")
}

/// Hand-built multipart body for part headers `Part::mime_type` refuses to produce.
///
/// `content_type` of `None` leaves the part without a `Content-Type` header.
pub fn raw_thumbnail_body(content_type: Option<&str>, data: &[u8]) -> Bytes {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", RAW_BOUNDARY).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"thumbnail\"; filename=\"thumb.bin\"\r\n",
    );
    if let Some(content_type) = content_type {
        body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", RAW_BOUNDARY).as_bytes());
    Bytes::from(body)
}

pub fn raw_multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", RAW_BOUNDARY)
}
