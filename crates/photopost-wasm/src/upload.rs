//! `Uploader` over a JavaScript "create record" function.
//!
//! The function is called with one object per file:
//!
//! ```typescript
//! {
//!   title: string,          // original file name
//!   pathOnClient: string,   // original file name
//!   versionData: string,    // base64 payload, no data: prefix
//!   mimeType: string,
//!   ownerRecordId: string,
//! }
//! ```
//!
//! It may return the new record id directly, a `{ id }` object, or a Promise
//! of either. A thrown error or rejected Promise fails that file only.

use async_trait::async_trait;
use photopost_core::{UploadError, UploadReceipt, UploadRequest, Uploader};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::types::{describe_js_error, to_js};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadPayload {
    title: String,
    path_on_client: String,
    version_data: String,
    mime_type: String,
    owner_record_id: String,
}

impl From<&UploadRequest> for UploadPayload {
    fn from(request: &UploadRequest) -> Self {
        Self {
            title: request.file_name.clone(),
            path_on_client: request.file_name.clone(),
            version_data: request.version_data(),
            mime_type: request.data.mime_type.clone(),
            owner_record_id: request.owner_record_id.clone(),
        }
    }
}

/// Uploader backed by a caller-supplied JS function.
pub struct JsUploader {
    create_record: js_sys::Function,
}

impl JsUploader {
    pub fn new(create_record: js_sys::Function) -> Self {
        Self { create_record }
    }
}

#[async_trait(?Send)]
impl Uploader for JsUploader {
    async fn create_record(&self, request: UploadRequest) -> Result<UploadReceipt, UploadError> {
        let payload = to_js(&UploadPayload::from(&request))
            .map_err(|e| UploadError(describe_js_error(&e)))?;
        let returned = self
            .create_record
            .call1(&JsValue::NULL, &payload)
            .map_err(|e| UploadError(describe_js_error(&e)))?;

        // Plain values resolve immediately
        let value = JsFuture::from(js_sys::Promise::resolve(&returned))
            .await
            .map_err(|e| UploadError(describe_js_error(&e)))?;

        let record_id = record_id_from_js(&value)
            .ok_or_else(|| UploadError("createRecord returned no record id".to_string()))?;
        Ok(UploadReceipt { record_id })
    }
}

/// Accept either `"id"` or `{ id: "id" }`.
fn record_id_from_js(value: &JsValue) -> Option<String> {
    let id = match value.as_string() {
        Some(id) => id,
        None if value.is_object() => js_sys::Reflect::get(value, &JsValue::from_str("id"))
            .ok()?
            .as_string()?,
        None => return None,
    };
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photopost_core::EncodedImage;

    #[test]
    fn test_payload_uses_file_name_and_base64() {
        let request = UploadRequest {
            file_name: "IMG_0001.jpg".to_string(),
            data: EncodedImage::new(b"hi!".to_vec(), "image/jpeg"),
            owner_record_id: "a0B5g000001".to_string(),
        };

        let payload = UploadPayload::from(&request);
        assert_eq!(payload.title, "IMG_0001.jpg");
        assert_eq!(payload.path_on_client, "IMG_0001.jpg");
        assert_eq!(payload.version_data, "aGkh");
        assert_eq!(payload.mime_type, "image/jpeg");
        assert_eq!(payload.owner_record_id, "a0B5g000001");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use photopost_core::EncodedImage;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn request() -> UploadRequest {
        UploadRequest {
            file_name: "a.jpg".to_string(),
            data: EncodedImage::new(vec![1, 2, 3], "image/jpeg"),
            owner_record_id: "owner".to_string(),
        }
    }

    #[wasm_bindgen_test]
    fn test_record_id_shapes() {
        assert_eq!(record_id_from_js(&"068".into()), Some("068".to_string()));

        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"id".into(), &"069".into()).unwrap();
        assert_eq!(record_id_from_js(&obj.into()), Some("069".to_string()));

        assert_eq!(record_id_from_js(&JsValue::UNDEFINED), None);
        assert_eq!(record_id_from_js(&"".into()), None);
    }

    #[wasm_bindgen_test]
    async fn test_awaits_returned_promise() {
        let create = js_sys::Function::new_with_args(
            "record",
            "return Promise.resolve({ id: 'rec-' + record.title });",
        );
        let receipt = JsUploader::new(create).create_record(request()).await.unwrap();
        assert_eq!(receipt.record_id, "rec-a.jpg");
    }

    #[wasm_bindgen_test]
    async fn test_rejection_becomes_upload_error() {
        let create = js_sys::Function::new_with_args(
            "record",
            "return Promise.reject(new Error('insufficient access'));",
        );
        let err = JsUploader::new(create).create_record(request()).await.unwrap_err();
        assert_eq!(err.0, "insufficient access");
    }
}
