//! Photopost WASM - WebAssembly bindings for the upload pipeline
//!
//! This crate exposes photopost-core to a browser page or Web Worker.
//!
//! # Module Structure
//!
//! - `uploader` - `ImageUploader`, the batch entry point for a file input
//! - `transform` - Synchronous helpers (target size, one-shot resize)
//! - `file` - `FilePayload` over `web_sys::File`
//! - `upload` - `Uploader` over a JS "create record" function
//! - `timer` - `Timer` over the global `setTimeout`
//! - `types` - WASM-compatible wrapper types
//! - `logging` - Forwards the pipeline's `tracing` events to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { ImageUploader } from '@photopost/wasm';
//!
//! await init();
//!
//! const uploader = new ImageUploader(undefined, (record) => api.createRecord(record));
//! const report = await uploader.handleFilesSelected(input.files, recordId);
//! console.log(`Uploaded ${report.processed.length} file(s)`);
//! ```

use wasm_bindgen::prelude::*;

mod file;
mod logging;
mod timer;
mod transform;
mod types;
mod upload;
mod uploader;

pub use file::BrowserFile;
pub use timer::JsTimer;
pub use transform::{is_image_type, resize_image, target_dimensions};
pub use types::{JsEncodedImage, JsTargetDimensions};
pub use upload::JsUploader;
pub use uploader::ImageUploader;

/// Initialize the WASM module (called automatically on load)
///
/// Installs the console subscriber at `INFO`: per-file failures appear as
/// warnings and every uploaded record id is logged.
#[wasm_bindgen(start)]
pub fn init() {
    logging::init(tracing_subscriber::filter::LevelFilter::INFO);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
