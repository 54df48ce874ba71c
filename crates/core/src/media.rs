//! Upload checks for post images.
//!
//! An upload is accepted only when its bytes decode as one of the supported
//! formats. The file name and declared content type are ignored; a text file
//! renamed to `.jpg` is still rejected.

use image::ImageFormat;

use crate::error::CoreError;
use crate::forms::MSG_INVALID_IMAGE;

/// Directory (relative to the media root) that post images are stored in.
pub const POST_IMAGE_DIR: &str = "posts";

/// Largest accepted upload, in bytes.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Image formats accepted for post images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Gif,
    Png,
    Jpeg,
    WebP,
}

impl ImageKind {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    fn format(&self) -> ImageFormat {
        match self {
            Self::Gif => ImageFormat::Gif,
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::WebP => ImageFormat::WebP,
        }
    }

    fn from_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Gif => Some(Self::Gif),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::WebP => Some(Self::WebP),
            _ => None,
        }
    }
}

/// Check that `bytes` hold a complete, decodable image.
///
/// Returns the detected kind so the caller can pick a file extension.
pub fn validate_image(bytes: &[u8]) -> Result<ImageKind, CoreError> {
    let invalid = || CoreError::Validation(MSG_INVALID_IMAGE.to_string());

    if bytes.is_empty() || bytes.len() > MAX_IMAGE_BYTES {
        return Err(invalid());
    }

    let kind = image::guess_format(bytes)
        .ok()
        .and_then(ImageKind::from_format)
        .ok_or_else(invalid)?;

    image::load_from_memory_with_format(bytes, kind.format()).map_err(|_| invalid())?;

    Ok(kind)
}

/// Relative storage path for a new post image, e.g. `posts/<name>.png`.
pub fn post_image_path(file_stem: &str, kind: ImageKind) -> String {
    format!("{POST_IMAGE_DIR}/{file_stem}.{}", kind.extension())
}
