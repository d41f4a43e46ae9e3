//! Target-size computation under a maximum-dimension constraint.

use serde::{Deserialize, Serialize};

/// Raster size an image will be rendered at before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetDimensions {
    pub width: u32,
    pub height: u32,
}

impl TargetDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Whether either edge exceeds `max_dimension`.
pub fn needs_resize(width: u32, height: u32, max_dimension: u32) -> bool {
    width > max_dimension || height > max_dimension
}

/// Compute the size to render a `width` x `height` image at.
///
/// Images that already fit are never enlarged. Otherwise the longer edge
/// becomes exactly `max_dimension` and the other edge is scaled by the same
/// factor, rounded to the nearest pixel and kept at least 1. A square image
/// takes the portrait branch, which also yields `max_dimension` on both edges.
///
/// `max_dimension` is treated as at least 1.
pub fn target_dimensions(width: u32, height: u32, max_dimension: u32) -> TargetDimensions {
    let max_dimension = max_dimension.max(1);
    if !needs_resize(width, height, max_dimension) {
        return TargetDimensions::new(width, height);
    }

    let (w, h, m) = (f64::from(width), f64::from(height), f64::from(max_dimension));
    if width > height {
        TargetDimensions::new(max_dimension, to_raster(h * (m / w)))
    } else {
        TargetDimensions::new(to_raster(w * (m / h)), max_dimension)
    }
}

fn to_raster(value: f64) -> u32 {
    (value.round() as u32).max(1)
}
