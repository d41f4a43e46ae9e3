//! Error types for the upload pipeline.
//!
//! Stage-level errors (`DecodeError`, `TransformError`, `UploadError`) live
//! next to the stage that produces them. `PipelineError` wraps them with the
//! name of the file being processed so a caller can show a per-file notice.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::transform::TransformError;
use crate::upload::UploadError;

/// Configuration validation errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// `maxDimension` must be a positive pixel count.
    #[error("Invalid max dimension: {0} (must be > 0)")]
    InvalidMaxDimension(u32),

    /// `quality` must be a finite value in (0, 1].
    #[error("Invalid quality: {0} (must be in (0, 1])")]
    InvalidQuality(f32),

    /// The requested output format has no encoder.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// A stage timeout was set to zero.
    #[error("Invalid timeout for {stage} stage: must be > 0ms")]
    InvalidTimeout { stage: &'static str },
}

/// Per-file pipeline failure. Never fatal to a batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The byte payload could not be retrieved.
    #[error("Read error for {file_name}: {message}")]
    Read { file_name: String, message: String },

    /// The payload is not a decodable image.
    #[error("Decode error for {file_name}: {source}")]
    Decode {
        file_name: String,
        #[source]
        source: DecodeError,
    },

    /// Rasterization or encoding failed.
    #[error("Transform error for {file_name}: {source}")]
    Transform {
        file_name: String,
        #[source]
        source: TransformError,
    },

    /// The external uploader rejected the record.
    #[error("Upload error for {file_name}: {source}")]
    Upload {
        file_name: String,
        #[source]
        source: UploadError,
    },

    /// An asynchronous stage did not finish in time.
    #[error("Timeout in {stage} stage for {file_name} after {timeout_ms}ms")]
    Timeout {
        file_name: String,
        stage: &'static str,
        timeout_ms: u64,
    },
}

impl PipelineError {
    /// Name of the file this failure belongs to.
    pub fn file_name(&self) -> &str {
        match self {
            PipelineError::Read { file_name, .. }
            | PipelineError::Decode { file_name, .. }
            | PipelineError::Transform { file_name, .. }
            | PipelineError::Upload { file_name, .. }
            | PipelineError::Timeout { file_name, .. } => file_name,
        }
    }

    /// Pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Read { .. } => "read",
            PipelineError::Decode { .. } => "decode",
            PipelineError::Transform { .. } => "transform",
            PipelineError::Upload { .. } => "upload",
            PipelineError::Timeout { stage, .. } => stage,
        }
    }
}

/// Convenience alias for per-file pipeline results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidQuality(1.5);
        assert_eq!(err.to_string(), "Invalid quality: 1.5 (must be in (0, 1])");

        let err = ConfigError::UnsupportedFormat("image/tiff".to_string());
        assert_eq!(err.to_string(), "Unsupported output format: image/tiff");

        let err = ConfigError::InvalidTimeout { stage: "upload" };
        assert_eq!(err.to_string(), "Invalid timeout for upload stage: must be > 0ms");
    }

    #[test]
    fn test_pipeline_error_carries_file_name() {
        let err = PipelineError::Decode {
            file_name: "broken.jpg".to_string(),
            source: DecodeError::UnsupportedFormat("image/heic".to_string()),
        };
        assert_eq!(err.file_name(), "broken.jpg");
        assert_eq!(err.stage(), "decode");
        assert!(err.to_string().contains("broken.jpg"));
        assert!(err.to_string().contains("image/heic"));
    }

    #[test]
    fn test_timeout_reports_its_stage() {
        let err = PipelineError::Timeout {
            file_name: "slow.png".to_string(),
            stage: "read",
            timeout_ms: 500,
        };
        assert_eq!(err.stage(), "read");
        assert_eq!(
            err.to_string(),
            "Timeout in read stage for slow.png after 500ms"
        );
    }

    #[test]
    fn test_read_error_display() {
        let err = PipelineError::Read {
            file_name: "notes.txt".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(err.stage(), "read");
        assert_eq!(
            err.to_string(),
            "Read error for notes.txt: permission denied"
        );
    }
}
