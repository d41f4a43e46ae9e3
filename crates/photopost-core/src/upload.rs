//! The external "create record" capability.
//!
//! The pipeline does not store anything itself. For every processed file it
//! hands an `UploadRequest` to an `Uploader` and records the returned id.

use async_trait::async_trait;
use thiserror::Error;

use crate::encode::EncodedImage;

/// The uploader rejected or failed to create a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct UploadError(pub String);

/// Everything the backend needs to create one file record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Original file name; used as both title and client path.
    pub file_name: String,
    /// Encoded (or passed-through) payload.
    pub data: EncodedImage,
    /// Opaque id of the record the file is attached to.
    pub owner_record_id: String,
}

impl UploadRequest {
    /// Base64 payload, i.e. the part of the data URI after the comma.
    pub fn version_data(&self) -> String {
        self.data.to_base64()
    }
}

/// Id of the record the backend created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub record_id: String,
}

/// Creates backend records for processed files.
///
/// Uses `async_trait(?Send)` so browser-backed implementations, whose futures
/// are not `Send`, can be stored as `Box<dyn Uploader>`.
#[async_trait(?Send)]
pub trait Uploader {
    async fn create_record(&self, request: UploadRequest) -> Result<UploadReceipt, UploadError>;
}
