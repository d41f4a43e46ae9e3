//! JPEG encoding for upload.
//!
//! Uses the `image` crate's baseline JPEG encoder. Quality is expressed to
//! callers as a factor in (0, 1] and mapped onto the encoder's 1-100 scale.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use super::{check_buffer, EncodeError};

/// Map a quality factor in (0, 1] to the JPEG encoder's 1-100 scale.
///
/// Out-of-range and non-finite inputs are clamped (NaN maps to 1).
pub fn jpeg_quality(quality: f32) -> u8 {
    let scaled = (quality * 100.0).round();
    if scaled.is_nan() {
        return 1;
    }
    scaled.clamp(1.0, 100.0) as u8
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for a zero-sized image,
/// `EncodeError::InvalidPixelData` when the buffer length is wrong, and
/// `EncodeError::EncodingFailed` if the encoder itself fails.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    check_buffer(pixels, width, height)?;

    let quality = quality.clamp(1, 100);
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(jpeg_quality(0.75), 75);
        assert_eq!(jpeg_quality(1.0), 100);
        assert_eq!(jpeg_quality(0.001), 1);
        assert_eq!(jpeg_quality(0.9), 90);
        assert_eq!(jpeg_quality(2.0), 100);
        assert_eq!(jpeg_quality(f32::NAN), 1);
    }

    #[test]
    fn test_encode_jpeg_basic() {
        let pixels = vec![128u8; 100 * 100 * 3];
        let jpeg_bytes = encode_jpeg(&pixels, 100, 100, 75).unwrap();

        // SOI and EOI markers
        assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8]);
        let len = jpeg_bytes.len();
        assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let pixels = vec![128u8; 10 * 10 * 3];
        assert!(encode_jpeg(&pixels, 10, 10, 0).is_ok());
        assert!(encode_jpeg(&pixels, 10, 10, 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_invalid_pixel_data() {
        let pixels = vec![128u8; 99 * 100 * 3]; // One row short
        let result = encode_jpeg(&pixels, 100, 100, 75);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_jpeg_zero_dimensions() {
        let result = encode_jpeg(&[], 0, 100, 75);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_lower_quality_is_smaller_for_detailed_images() {
        let (width, height) = (64usize, 64usize);
        let pixels: Vec<u8> = (0..width * height * 3)
            .map(|i| ((i * 37) % 256) as u8)
            .collect();

        let low = encode_jpeg(&pixels, width as u32, height as u32, 10).unwrap();
        let high = encode_jpeg(&pixels, width as u32, height as u32, 95).unwrap();
        assert!(high.len() > low.len(), "low={} high={}", low.len(), high.len());
    }
}
