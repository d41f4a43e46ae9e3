//! Synchronous pipeline bindings.
//!
//! Exposes the dimension algorithm and a one-shot decode → resize → encode
//! for callers that manage reading and uploading themselves.
//!
//! # Example
//!
//! ```typescript
//! import { target_dimensions, resize_image } from '@photopost/wasm';
//!
//! const size = target_dimensions(4000, 3000, 2048); // 2048 x 1536
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const encoded = resize_image(bytes, file.type, { quality: 0.8 });
//! ```

use crate::types::{config_from_js, JsEncodedImage, JsTargetDimensions};
use photopost_core::decode::{classify, is_image_mime, Loaded};
use photopost_core::{transform, EncodedImage};
use wasm_bindgen::prelude::*;

/// Compute the size an image would be rendered at. Never enlarges.
#[wasm_bindgen]
pub fn target_dimensions(width: u32, height: u32, max_dimension: u32) -> JsTargetDimensions {
    transform::target_dimensions(width, height, max_dimension).into()
}

/// Whether a declared MIME type is an image kind and would be resized.
#[wasm_bindgen]
pub fn is_image_type(mime_type: &str) -> bool {
    is_image_mime(mime_type)
}

/// Decode, downscale and re-encode one payload.
///
/// Non-image payloads are returned unchanged.
///
/// # Arguments
///
/// * `bytes` - File contents
/// * `mime_type` - Declared MIME type of the file
/// * `options` - Optional `{ maxDimension, quality, outputFormat, filter }`
///
/// # Errors
///
/// Returns an error string if the options are invalid, the image cannot be
/// decoded, or rasterization/encoding fails.
#[wasm_bindgen]
pub fn resize_image(
    bytes: Vec<u8>,
    mime_type: &str,
    options: JsValue,
) -> Result<JsEncodedImage, JsValue> {
    let config = config_from_js(options)?;
    let loaded =
        classify("input", mime_type, bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let encoded = match loaded {
        Loaded::Image(bitmap) => transform::resize(bitmap, &config.resize)
            .map_err(|e| JsValue::from_str(&e.to_string()))?,
        Loaded::PassThrough { bytes, mime_type } => EncodedImage::new(bytes, mime_type),
    };
    Ok(JsEncodedImage::from_encoded(encoded))
}
