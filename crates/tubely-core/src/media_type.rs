//! Media type parsing and the thumbnail allowlist.
//!
//! A declared `Content-Type` such as `image/JPEG; q=0.9` is reduced to its lowercase
//! `type/subtype` before it is compared against the allowlist, so parameters can never be
//! used to slip past it.

use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaTypeError {
    #[error("no media type")]
    Empty,

    #[error("expected type/subtype in '{0}'")]
    MissingSlash(String),

    #[error("invalid token in '{0}'")]
    InvalidToken(String),

    #[error("invalid media parameter '{0}'")]
    InvalidParameter(String),
}

/// RFC 2045 token characters.
fn is_token_char(c: char) -> bool {
    c.is_ascii() && !c.is_ascii_control() && !c.is_ascii_whitespace() && !"()<>@,;:\\\"/[]?=".contains(c)
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_token_char)
}

/// Parse a `Content-Type` value into its lowercase `type/subtype`, dropping parameters.
///
/// Parameters must still be well formed (`key=value`); the value may be quoted.
pub fn parse_media_type(raw: &str) -> Result<String, MediaTypeError> {
    let mut parts = raw.split(';');
    let essence = parts.next().map(str::trim).unwrap_or_default();
    if essence.is_empty() {
        return Err(MediaTypeError::Empty);
    }

    let (kind, subtype) = essence
        .split_once('/')
        .ok_or_else(|| MediaTypeError::MissingSlash(essence.to_string()))?;
    if !is_token(kind) || !is_token(subtype) {
        return Err(MediaTypeError::InvalidToken(essence.to_string()));
    }

    for param in parts {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }
        let (key, value) = param
            .split_once('=')
            .ok_or_else(|| MediaTypeError::InvalidParameter(param.to_string()))?;
        let value = value.trim();
        let quoted = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');
        if !is_token(key.trim()) || !(quoted || is_token(value)) {
            return Err(MediaTypeError::InvalidParameter(param.to_string()));
        }
    }

    Ok(essence.to_ascii_lowercase())
}

/// Media types accepted as thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailMediaType {
    Png,
    Jpeg,
}

impl ThumbnailMediaType {
    pub const ALLOWED: [ThumbnailMediaType; 2] = [ThumbnailMediaType::Png, ThumbnailMediaType::Jpeg];

    /// Match an already parsed `type/subtype` against the allowlist.
    pub fn from_essence(essence: &str) -> Option<Self> {
        match essence {
            "image/png" => Some(ThumbnailMediaType::Png),
            "image/jpeg" => Some(ThumbnailMediaType::Jpeg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThumbnailMediaType::Png => "image/png",
            ThumbnailMediaType::Jpeg => "image/jpeg",
        }
    }

    /// File extension used in the storage key: the subtype of the media type.
    pub fn extension(&self) -> &'static str {
        match self {
            ThumbnailMediaType::Png => "png",
            ThumbnailMediaType::Jpeg => "jpeg",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALLOWED
            .into_iter()
            .find(|media_type| media_type.extension() == extension)
    }
}

impl Display for ThumbnailMediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
