//! Encoding stage: rasterized bitmap in, compressed bytes out.
//!
//! This module provides functionality for:
//! - Encoding bitmaps to the configured `OutputFormat` at a quality factor
//! - Carrying the result as an `EncodedImage` (bytes plus MIME type)
//! - Rendering an `EncodedImage` as base64 or a `data:` URI for upload
//!
//! # Examples
//!
//! ```ignore
//! use photopost_core::encode::encode;
//! use photopost_core::OutputFormat;
//!
//! let encoded = encode(&bitmap, OutputFormat::Jpeg, 0.75)?;
//! println!("Encoded {} bytes as {}", encoded.len(), encoded.mime_type);
//! ```

mod jpeg;
mod png;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::OutputFormat;
use crate::decode::Bitmap;

pub use jpeg::{encode_jpeg, jpeg_quality};
pub use png::encode_png;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Validate an RGB buffer against its declared dimensions.
pub(crate) fn check_buffer(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or(EncodeError::InvalidDimensions { width, height })?;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// A compressed payload and its MIME type. Handed to the uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl EncodedImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard, padded base64 of the payload.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// `data:<mime>;base64,<payload>`, as produced by a browser canvas.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// Encode a bitmap to `format`. `quality` is ignored for lossless formats.
pub fn encode(
    bitmap: &Bitmap,
    format: OutputFormat,
    quality: f32,
) -> Result<EncodedImage, EncodeError> {
    let bytes = match format {
        OutputFormat::Jpeg => encode_jpeg(
            &bitmap.pixels,
            bitmap.width,
            bitmap.height,
            jpeg_quality(quality),
        )?,
        OutputFormat::Png => encode_png(&bitmap.pixels, bitmap.width, bitmap.height)?,
    };
    Ok(EncodedImage::new(bytes, format.mime_type()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32) -> Bitmap {
        Bitmap::new(width, height, vec![128u8; (width * height * 3) as usize])
    }

    #[test]
    fn test_encode_dispatches_on_format() {
        let jpeg = encode(&gray(8, 8), OutputFormat::Jpeg, 0.75).unwrap();
        assert_eq!(jpeg.mime_type, "image/jpeg");
        assert_eq!(&jpeg.bytes[0..2], &[0xFF, 0xD8]);

        let png = encode(&gray(8, 8), OutputFormat::Png, 0.75).unwrap();
        assert_eq!(png.mime_type, "image/png");
        assert_eq!(&png.bytes[1..4], b"PNG");
    }

    #[test]
    fn test_encode_rejects_empty_bitmap() {
        let result = encode(&Bitmap::new(0, 0, vec![]), OutputFormat::Jpeg, 0.75);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_data_uri_matches_canvas_shape() {
        let encoded = EncodedImage::new(b"hello".to_vec(), "image/jpeg");
        assert_eq!(encoded.to_base64(), "aGVsbG8=");
        assert_eq!(encoded.to_data_uri(), "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn test_data_uri_payload_is_part_after_comma() {
        let encoded = encode(&gray(4, 4), OutputFormat::Png, 1.0).unwrap();
        let uri = encoded.to_data_uri();
        let payload = uri.split(',').nth(1).unwrap();
        assert_eq!(payload, encoded.to_base64());
    }

    #[test]
    fn test_check_buffer() {
        assert!(check_buffer(&[0u8; 12], 2, 2).is_ok());
        assert!(matches!(
            check_buffer(&[0u8; 11], 2, 2),
            Err(EncodeError::InvalidPixelData {
                expected: 12,
                actual: 11
            })
        ));
        assert!(matches!(
            check_buffer(&[], 0, 2),
            Err(EncodeError::InvalidDimensions { width: 0, height: 2 })
        ));
    }

    #[test]
    fn test_encoded_image_len() {
        let encoded = EncodedImage::new(vec![1, 2, 3], "text/plain");
        assert_eq!(encoded.len(), 3);
        assert!(!encoded.is_empty());
        assert!(EncodedImage::new(vec![], "text/plain").is_empty());
    }
}
