//! Frame decoding: data URI → image bytes → BGR pixel buffer.
//!
//! Browsers submit frames as `canvas.toDataURL()` output. The header before
//! the `base64,` marker (mime type, charset) is ignored; the image format is
//! sniffed from the decoded bytes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Separator between the data-URI header and the payload.
pub const BASE64_MARKER: &str = "base64,";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("frame is not a base64 data URI (missing `base64,` separator)")]
    MissingSeparator,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl crate::event::ErrorCode for DecodeError {
    fn error_code(&self) -> &'static str {
        "E_DECODE"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImageFormatError {
    #[error("unreadable image: {0}")]
    Unreadable(#[from] image::ImageError),
    #[error("image decode aborted: {0}")]
    Aborted(String),
}

impl crate::event::ErrorCode for ImageFormatError {
    fn error_code(&self) -> &'static str {
        "E_IMAGE_FORMAT"
    }
}

// =============================================================================
// PIXEL BUFFER
// =============================================================================

/// Tightly packed 8-bit image in BGR channel order, the layout hand-tracking
/// models built on OpenCV expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgrImage {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` bytes, row-major.
    pub data: Vec<u8>,
}

impl BgrImage {
    /// Convert any decoded image to BGR. Gray and alpha images are expanded
    /// to RGB first.
    #[must_use]
    pub fn from_dynamic(img: &image::DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut data = rgb.into_raw();
        for px in data.chunks_exact_mut(3) {
            px.swap(0, 2);
        }
        Self { width, height, data }
    }
}

// =============================================================================
// DECODE
// =============================================================================

/// Return the base64 payload that follows the data-URI header.
pub fn strip_data_uri(frame: &str) -> Result<&str, DecodeError> {
    let Some((_, payload)) = frame.split_once(BASE64_MARKER) else {
        return Err(DecodeError::MissingSeparator);
    };
    Ok(payload.trim())
}

/// Decode a data-URI frame into raw image bytes. Line breaks and other
/// ASCII whitespace inside the payload are skipped.
pub fn decode_payload(frame: &str) -> Result<Vec<u8>, DecodeError> {
    let payload = strip_data_uri(frame)?;
    if !payload.bytes().any(|b| b.is_ascii_whitespace()) {
        return Ok(STANDARD.decode(payload)?);
    }
    let compact: Vec<u8> = payload
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    Ok(STANDARD.decode(compact)?)
}

/// Decode raw image bytes (PNG, JPEG, WebP, ...) into a BGR buffer.
pub fn decode_image(bytes: &[u8]) -> Result<BgrImage, ImageFormatError> {
    let img = image::load_from_memory(bytes)?;
    Ok(BgrImage::from_dynamic(&img))
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "decode_test.rs"]
mod tests;
