//! Photopost Core - client-side image downscale and upload pipeline
//!
//! Each selected file runs through three stages, strictly in selection order:
//!
//! 1. **Load** (`decode`) - read the payload; decode it if the declared type is
//!    an image, otherwise pass it through untouched.
//! 2. **Transform** (`transform`, `encode`) - shrink the bitmap so neither edge
//!    exceeds `ResizeSpec::max_dimension`, then re-encode at the configured
//!    quality.
//! 3. **Upload** (`upload`) - hand the payload to an external `Uploader`.
//!
//! `batch::BatchProcessor` drives the stages, isolates per-file failures and
//! appends successes to a shared `batch::ResultCollector`.

pub mod batch;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod timer;
pub mod transform;
pub mod upload;

pub use batch::{
    BatchProcessor, BatchReport, FileFailure, ProcessedFile, ProcessedRecord, ResultCollector,
    WeakResultCollector,
};
pub use config::{OutputFormat, PipelineConfig, ResizeSpec, StageTimeouts};
pub use decode::{Bitmap, FilePayload, FilterType, InMemoryFile, Loaded};
pub use encode::EncodedImage;
pub use error::{ConfigError, PipelineError, PipelineResult};
pub use timer::Timer;
pub use transform::{resize, target_dimensions, TargetDimensions, TransformError};
pub use upload::{UploadError, UploadReceipt, UploadRequest, Uploader};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_dimension_examples() {
        assert_eq!(
            target_dimensions(4000, 3000, 2048),
            TargetDimensions::new(2048, 1536)
        );
        assert_eq!(
            target_dimensions(1000, 2048, 2048),
            TargetDimensions::new(1000, 2048)
        );
    }

    #[test]
    fn test_default_config_matches_documented_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.resize.max_dimension(), config::DEFAULT_MAX_DIMENSION);
        assert_eq!(config.resize.quality(), config::DEFAULT_QUALITY);
        assert_eq!(config.resize.output_format(), OutputFormat::Jpeg);
        assert!(config.validate().is_ok());
    }
}
