//! `FilePayload` over a browser `File`.

use async_trait::async_trait;
use photopost_core::decode::ReadError;
use photopost_core::FilePayload;
use wasm_bindgen_futures::JsFuture;

use crate::types::describe_js_error;

/// A file picked by the user.
///
/// Name and type are read once at construction; the payload is read lazily
/// through `Blob.arrayBuffer()`.
pub struct BrowserFile {
    file: web_sys::File,
    name: String,
    mime_type: String,
}

impl BrowserFile {
    pub fn new(file: web_sys::File) -> Self {
        let name = file.name();
        let mime_type = file.type_();
        Self {
            file,
            name,
            mime_type,
        }
    }

    /// Collect every entry of a `FileList`, preserving selection order.
    pub fn from_list(files: &web_sys::FileList) -> Vec<BrowserFile> {
        (0..files.length())
            .filter_map(|i| files.get(i))
            .map(BrowserFile::new)
            .collect()
    }
}

#[async_trait(?Send)]
impl FilePayload for BrowserFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, ReadError> {
        let buffer = JsFuture::from(self.file.array_buffer())
            .await
            .map_err(|e| ReadError(describe_js_error(&e)))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}
