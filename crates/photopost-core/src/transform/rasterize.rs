//! Render a bitmap onto a surface of a given size.
//!
//! Uses the `image` crate's separable resampling filters. Rendering at the
//! source size is a no-op and returns the bitmap untouched.

use super::{TargetDimensions, TransformError};
use crate::decode::{Bitmap, FilterType};

/// Rasterize `source` into a surface of exactly `target`.
///
/// # Errors
///
/// Returns `TransformError::InvalidTarget` if either target edge is zero and
/// `TransformError::Rasterize` if the source buffer does not match its
/// dimensions.
pub fn rasterize(
    source: Bitmap,
    target: TargetDimensions,
    filter: FilterType,
) -> Result<Bitmap, TransformError> {
    if target.width == 0 || target.height == 0 {
        return Err(TransformError::InvalidTarget {
            width: target.width,
            height: target.height,
        });
    }

    if source.width == target.width && source.height == target.height {
        return Ok(source);
    }

    let view = source.as_rgb_view().ok_or_else(|| {
        TransformError::Rasterize(format!(
            "pixel buffer of {} bytes does not match {}x{}",
            source.pixels.len(),
            source.width,
            source.height
        ))
    })?;

    let resized = image::imageops::resize(
        &view,
        target.width,
        target.height,
        filter.to_image_filter(),
    );

    Ok(Bitmap::from_rgb_image(resized))
}
