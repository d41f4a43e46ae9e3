//! Loader stage: file payload in, decoded bitmap (or passthrough) out.

use std::io::Cursor;

use async_trait::async_trait;
use image::{ImageError, ImageFormat, ImageReader};
use thiserror::Error;

use super::{Bitmap, DecodeError};
use crate::error::{PipelineError, PipelineResult};

/// MIME type reported for payloads that declare none.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// The byte payload of a selected file could not be retrieved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ReadError(pub String);

/// A user-selected file: a name, a declared MIME type, and bytes that can be
/// read asynchronously.
#[async_trait(?Send)]
pub trait FilePayload {
    /// File name as presented by the selection.
    fn name(&self) -> &str;

    /// Declared MIME type; may be empty when the platform could not tell.
    fn mime_type(&self) -> &str;

    /// Read the full byte payload.
    async fn read_bytes(&self) -> Result<Vec<u8>, ReadError>;
}

/// A file whose payload is already in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl InMemoryFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

#[async_trait(?Send)]
impl FilePayload for InMemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, ReadError> {
        Ok(self.bytes.clone())
    }
}

/// Outcome of the loader stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded {
    /// An image payload, decoded and ready for the transform stage.
    Image(Bitmap),
    /// A non-image payload; forwarded downstream byte-for-byte.
    PassThrough { bytes: Vec<u8>, mime_type: String },
}

impl Loaded {
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Loaded::PassThrough { .. })
    }
}

/// Whether a declared MIME type names an image kind (`image/*`).
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type
        .trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Read and classify a file.
///
/// Non-image payloads come back as `Loaded::PassThrough` without ever being
/// handed to a decoder.
///
/// # Errors
///
/// `PipelineError::Read` if the payload cannot be read,
/// `PipelineError::Decode` if an image payload fails to decode.
pub async fn load<F: FilePayload + ?Sized>(file: &F) -> PipelineResult<Loaded> {
    let bytes = file.read_bytes().await.map_err(|e| PipelineError::Read {
        file_name: file.name().to_string(),
        message: e.0,
    })?;
    classify(file.name(), file.mime_type(), bytes)
}

/// Classify an already-read payload by its declared type and decode it if it
/// is an image.
pub fn classify(file_name: &str, mime_type: &str, bytes: Vec<u8>) -> PipelineResult<Loaded> {
    if !is_image_mime(mime_type) {
        tracing::debug!(file = file_name, mime = mime_type, "Not an image, passing through");
        let mime_type = if mime_type.trim().is_empty() {
            FALLBACK_MIME_TYPE.to_string()
        } else {
            mime_type.to_string()
        };
        return Ok(Loaded::PassThrough { bytes, mime_type });
    }

    let bitmap = decode_image(&bytes, mime_type).map_err(|source| PipelineError::Decode {
        file_name: file_name.to_string(),
        source,
    })?;
    tracing::debug!(
        file = file_name,
        width = bitmap.width,
        height = bitmap.height,
        "Decoded image"
    );
    Ok(Loaded::Image(bitmap))
}

/// Decode image bytes into an RGB bitmap.
///
/// The format is sniffed from the content; the declared MIME type is only
/// consulted when sniffing fails.
///
/// # Errors
///
/// Returns `DecodeError::Empty` for an empty payload,
/// `DecodeError::UnsupportedFormat` when no compiled-in codec matches, and
/// `DecodeError::CorruptedFile` when the codec rejects the data.
pub fn decode_image(bytes: &[u8], declared_mime: &str) -> Result<Bitmap, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        let hinted = ImageFormat::from_mime_type(declared_mime.trim())
            .ok_or_else(|| DecodeError::UnsupportedFormat(declared_mime.to_string()))?;
        reader.set_format(hinted);
    }

    let img = reader.decode().map_err(|e| match e {
        ImageError::Unsupported(_) => DecodeError::UnsupportedFormat(e.to_string()),
        _ => DecodeError::CorruptedFile(e.to_string()),
    })?;

    if img.color().has_alpha() {
        Ok(Bitmap::from_rgba_over_black(img.into_rgba8()))
    } else {
        Ok(Bitmap::from_rgb_image(img.into_rgb8()))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Encode a gradient of the given size as PNG.
    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([
                ((x * 255) / width.max(1)) as u8,
                ((y * 255) / height.max(1)) as u8,
                128,
            ])
        });
        let mut buffer = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    /// Encode a fully transparent image whose hidden colour is `rgb`.
    pub fn transparent_png_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let [r, g, b] = rgb;
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([r, g, b, 0]));
        let mut buffer = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    /// A file whose payload can never be read.
    pub struct UnreadableFile {
        pub name: String,
        pub mime_type: String,
    }

    #[async_trait(?Send)]
    impl FilePayload for UnreadableFile {
        fn name(&self) -> &str {
            &self.name
        }

        fn mime_type(&self) -> &str {
            &self.mime_type
        }

        async fn read_bytes(&self) -> Result<Vec<u8>, ReadError> {
            Err(ReadError(format!(
                "There was an error reading file: {}",
                self.name
            )))
        }
    }
}
