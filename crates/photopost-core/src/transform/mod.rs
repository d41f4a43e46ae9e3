//! Resize/encode transform stage.
//!
//! Takes ownership of a decoded bitmap, computes the target size under the
//! `ResizeSpec`'s maximum dimension, rasterizes at that size and re-encodes at the
//! `ResizeSpec`'s quality. Both rasterization (when the size changes) and lossy
//! encoding discard detail.

mod dimensions;
mod rasterize;

use thiserror::Error;

use crate::config::ResizeSpec;
use crate::decode::Bitmap;
use crate::encode::{encode, EncodeError, EncodedImage};

pub use dimensions::{needs_resize, target_dimensions, TargetDimensions};
pub use rasterize::rasterize;

/// Errors from the transform stage.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The source bitmap has no pixels.
    #[error("Source image is empty ({width}x{height})")]
    EmptySource { width: u32, height: u32 },

    /// A target surface edge is zero.
    #[error("Invalid target surface: {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },

    /// Resampling failed.
    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    /// Encoding the rasterized surface failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Downscale (if needed) and re-encode a decoded image.
///
/// Output dimensions are fully determined by the source size and the `ResizeSpec`;
/// encoded bytes depend on the encoder.
///
/// # Errors
///
/// Returns `TransformError::EmptySource` for a zero-sized bitmap and
/// propagates rasterization and encoding failures.
pub fn resize(source: Bitmap, spec: &ResizeSpec) -> Result<EncodedImage, TransformError> {
    if source.is_empty() {
        return Err(TransformError::EmptySource {
            width: source.width,
            height: source.height,
        });
    }

    let target = target_dimensions(source.width, source.height, spec.max_dimension());
    tracing::debug!(
        source_width = source.width,
        source_height = source.height,
        width = target.width,
        height = target.height,
        "Rasterizing"
    );

    let surface = rasterize(source, target, spec.filter())?;
    let encoded = encode(&surface, spec.output_format(), spec.quality())?;
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    fn gray(width: u32, height: u32) -> Bitmap {
        Bitmap::new(width, height, vec![90u8; (width * height * 3) as usize])
    }

    fn decoded_size(encoded: &EncodedImage) -> (u32, u32) {
        let img = image::load_from_memory(&encoded.bytes).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn test_resize_downscales_landscape() {
        let spec = ResizeSpec::new(64, 0.75, OutputFormat::Jpeg).unwrap();
        let encoded = resize(gray(200, 150), &spec).unwrap();

        assert_eq!(encoded.mime_type, "image/jpeg");
        assert_eq!(decoded_size(&encoded), (64, 48));
    }

    #[test]
    fn test_resize_keeps_compliant_dimensions() {
        let spec = ResizeSpec::new(64, 0.75, OutputFormat::Png).unwrap();
        let encoded = resize(gray(30, 64), &spec).unwrap();

        assert_eq!(encoded.mime_type, "image/png");
        assert_eq!(decoded_size(&encoded), (30, 64));
    }

    #[test]
    fn test_resize_square_tie() {
        let spec = ResizeSpec::new(32, 0.5, OutputFormat::Png).unwrap();
        let encoded = resize(gray(100, 100), &spec).unwrap();
        assert_eq!(decoded_size(&encoded), (32, 32));
    }

    #[test]
    fn test_resize_empty_source_error() {
        let spec = ResizeSpec::default();
        let result = resize(Bitmap::new(0, 0, vec![]), &spec);
        assert!(matches!(result, Err(TransformError::EmptySource { .. })));
    }

    #[test]
    fn test_resize_reports_rasterize_failure() {
        let spec = ResizeSpec::new(4, 0.75, OutputFormat::Jpeg).unwrap();
        let broken = Bitmap {
            width: 10,
            height: 10,
            pixels: vec![0u8; 30],
        };
        let result = resize(broken, &spec);
        assert!(matches!(result, Err(TransformError::Rasterize(_))));
    }

    #[test]
    fn test_resize_reports_encode_failure() {
        // Dimensions fit, so the mismatched buffer reaches the encoder
        let spec = ResizeSpec::new(64, 0.75, OutputFormat::Jpeg).unwrap();
        let broken = Bitmap {
            width: 10,
            height: 10,
            pixels: vec![0u8; 30],
        };
        let err = resize(broken, &spec).unwrap_err();
        assert!(matches!(err, TransformError::Encode(_)));
        assert!(err.to_string().contains("Invalid pixel data"));
    }

    #[test]
    fn test_resize_is_dimension_deterministic() {
        let spec = ResizeSpec::new(50, 0.75, OutputFormat::Jpeg).unwrap();
        let a = resize(gray(123, 77), &spec).unwrap();
        let b = resize(gray(123, 77), &spec).unwrap();
        assert_eq!(decoded_size(&a), decoded_size(&b));
        assert_eq!(decoded_size(&a), (50, 31));
    }
}
