//! WASM-compatible wrapper types.
//!
//! Converts between core pipeline types and the shapes handed to JavaScript.
//! Plain-data results go through `serde-wasm-bindgen`; encoded payloads are a
//! `#[wasm_bindgen]` class so the bytes stay in WASM memory until requested.

use photopost_core::{
    BatchReport, EncodedImage, FileFailure, PipelineConfig, ProcessedRecord, TargetDimensions,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// An encoded payload (or a passed-through file) for JavaScript.
#[wasm_bindgen]
pub struct JsEncodedImage {
    inner: EncodedImage,
}

#[wasm_bindgen]
impl JsEncodedImage {
    /// MIME type of the payload, e.g. `image/jpeg`.
    #[wasm_bindgen(getter, js_name = mimeType)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type.clone()
    }

    /// Payload size in bytes.
    #[wasm_bindgen(getter, js_name = byteLength)]
    pub fn byte_length(&self) -> usize {
        self.inner.len()
    }

    /// Returns the payload as a Uint8Array (copied out of WASM memory).
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    /// Base64 of the payload, without the `data:` prefix.
    #[wasm_bindgen(js_name = toBase64)]
    pub fn to_base64(&self) -> String {
        self.inner.to_base64()
    }

    /// `data:<mime>;base64,<payload>`
    #[wasm_bindgen(js_name = toDataUri)]
    pub fn to_data_uri(&self) -> String {
        self.inner.to_data_uri()
    }
}

impl JsEncodedImage {
    pub(crate) fn from_encoded(inner: EncodedImage) -> Self {
        Self { inner }
    }
}

/// Target raster size for JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsTargetDimensions {
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsTargetDimensions {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl From<TargetDimensions> for JsTargetDimensions {
    fn from(target: TargetDimensions) -> Self {
        Self {
            width: target.width,
            height: target.height,
        }
    }
}

/// A processed record as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsRecord {
    pub id: u32,
    pub file_name: String,
    pub mime_type: String,
    pub byte_length: usize,
    pub data: String,
    pub passthrough: bool,
    pub record_id: String,
}

impl From<&ProcessedRecord> for JsRecord {
    fn from(record: &ProcessedRecord) -> Self {
        Self {
            id: record.sequence_id,
            file_name: record.file_name.clone(),
            mime_type: record.data.mime_type.clone(),
            byte_length: record.data.len(),
            data: record.data.to_data_uri(),
            passthrough: record.passthrough,
            record_id: record.record_id.clone(),
        }
    }
}

/// A per-file failure notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsFailure {
    pub index: usize,
    pub file_name: String,
    pub stage: String,
    pub message: String,
}

impl From<&FileFailure> for JsFailure {
    fn from(failure: &FileFailure) -> Self {
        Self {
            index: failure.index,
            file_name: failure.error.file_name().to_string(),
            stage: failure.error.stage().to_string(),
            message: failure.error.to_string(),
        }
    }
}

/// Summary of one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsBatchReport {
    pub processed: Vec<u32>,
    pub failures: Vec<JsFailure>,
}

impl From<&BatchReport> for JsBatchReport {
    fn from(report: &BatchReport) -> Self {
        Self {
            processed: report.processed.clone(),
            failures: report.failures.iter().map(JsFailure::from).collect(),
        }
    }
}

/// Serialize any plain-data result for JavaScript.
pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Best-effort message for a thrown or rejected JS value.
pub(crate) fn describe_js_error(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{:?}", value)
}

/// Read pipeline options from a JS object; `undefined`/`null` mean defaults.
pub(crate) fn config_from_js(options: JsValue) -> Result<PipelineConfig, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(PipelineConfig::default());
    }
    let config: PipelineConfig = serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Invalid options: {}", e)))?;
    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(config)
}
