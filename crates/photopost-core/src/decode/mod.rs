//! Loader stage of the upload pipeline.
//!
//! This module provides functionality for:
//! - Reading a selected file's payload through the `FilePayload` trait
//! - Deciding whether the declared type is an image kind
//! - Decoding image payloads (JPEG, PNG, GIF, WebP, BMP) into RGB bitmaps
//!
//! Non-image payloads are never decoded; they are returned as
//! `Loaded::PassThrough` and forwarded unchanged.
//!
//! # Examples
//!
//! ```ignore
//! use photopost_core::decode::{load, InMemoryFile, Loaded};
//!
//! let file = InMemoryFile::new("photo.jpg", "image/jpeg", bytes);
//! if let Loaded::Image(bitmap) = load(&file).await? {
//!     println!("Decoded {}x{} image", bitmap.width, bitmap.height);
//! }
//! ```

mod loader;
mod types;

pub use loader::{
    classify, decode_image, is_image_mime, load, FilePayload, InMemoryFile, Loaded, ReadError,
    FALLBACK_MIME_TYPE,
};
pub use types::{Bitmap, DecodeError, FilterType};

#[cfg(test)]
pub(crate) use loader::test_support;
