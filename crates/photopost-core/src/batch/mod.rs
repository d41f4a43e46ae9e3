//! Batch orchestration: Loader → Transform → Uploader, one file at a time.
//!
//! Files are processed in selection order and each file's pipeline is awaited
//! to a terminal result before the next one starts. A failure is confined to
//! its file: it is logged, collected in the `BatchReport`, and the batch moves
//! on. Successful files are appended to a `ResultCollector`.

mod collector;

use std::time::Duration;

use crate::config::PipelineConfig;
use crate::decode::{classify, FilePayload, Loaded};
use crate::encode::EncodedImage;
use crate::error::{ConfigError, PipelineError, PipelineResult};
use crate::timer::{with_timeout, Timer};
use crate::transform;
use crate::upload::{UploadRequest, Uploader};

pub use collector::{ProcessedFile, ProcessedRecord, ResultCollector, WeakResultCollector};

/// A file that did not produce a record.
#[derive(Debug)]
pub struct FileFailure {
    /// Position of the file in the selection.
    pub index: usize,
    pub error: PipelineError,
}

/// Outcome of one batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Sequence ids appended by this batch, in order.
    pub processed: Vec<u32>,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failures.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the per-file pipeline over a selection of files.
pub struct BatchProcessor {
    config: PipelineConfig,
    uploader: Box<dyn Uploader>,
    timer: Option<Box<dyn Timer>>,
}

impl BatchProcessor {
    /// Create a processor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration fails validation.
    pub fn new(
        config: PipelineConfig,
        uploader: impl Uploader + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            uploader: Box::new(uploader),
            timer: None,
        })
    }

    /// Supply the clock used to enforce stage timeouts.
    pub fn with_timer(mut self, timer: impl Timer + 'static) -> Self {
        self.timer = Some(Box::new(timer));
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process every file in order, appending successes to `results`.
    ///
    /// Never fails as a whole; per-file failures are reported in the
    /// returned `BatchReport`.
    pub async fn run<F: FilePayload>(
        &self,
        files: &[F],
        owner_record_id: &str,
        results: &ResultCollector,
    ) -> BatchReport {
        if self.config.timeouts.any() && self.timer.is_none() {
            tracing::warn!("Stage timeouts configured without a timer; they will not be enforced");
        }

        let mut report = BatchReport::default();
        for (index, file) in files.iter().enumerate() {
            match self.process_file(file, owner_record_id).await {
                Ok(processed) => {
                    let record = results.append(processed);
                    report.processed.push(record.sequence_id);
                }
                Err(error) => {
                    tracing::warn!(
                        file = error.file_name(),
                        stage = error.stage(),
                        error = %error,
                        "File failed, continuing with the rest of the batch"
                    );
                    report.failures.push(FileFailure { index, error });
                }
            }
        }

        tracing::debug!(
            processed = report.processed.len(),
            failed = report.failures.len(),
            "Batch finished"
        );
        report
    }

    /// Run one file through load, transform and upload.
    pub async fn process_file<F: FilePayload + ?Sized>(
        &self,
        file: &F,
        owner_record_id: &str,
    ) -> PipelineResult<ProcessedFile> {
        let file_name = file.name().to_string();
        let timeouts = self.config.timeouts;

        tracing::debug!(file = %file_name, mime = file.mime_type(), "Reading payload");
        let bytes = self
            .bounded(timeouts.read(), file.read_bytes())
            .await
            .ok_or_else(|| PipelineError::Timeout {
                file_name: file_name.clone(),
                stage: "read",
                timeout_ms: timeouts.read_timeout_ms.unwrap_or_default(),
            })?
            .map_err(|e| PipelineError::Read {
                file_name: file_name.clone(),
                message: e.0,
            })?;

        let (data, passthrough) = match classify(&file_name, file.mime_type(), bytes)? {
            Loaded::Image(bitmap) => {
                let encoded = transform::resize(bitmap, &self.config.resize).map_err(|source| {
                    PipelineError::Transform {
                        file_name: file_name.clone(),
                        source,
                    }
                })?;
                (encoded, false)
            }
            Loaded::PassThrough { bytes, mime_type } => (EncodedImage::new(bytes, mime_type), true),
        };
        tracing::debug!(file = %file_name, bytes = data.len(), passthrough, "Payload ready");

        let request = UploadRequest {
            file_name: file_name.clone(),
            data: data.clone(),
            owner_record_id: owner_record_id.to_string(),
        };
        let receipt = self
            .bounded(timeouts.upload(), self.uploader.create_record(request))
            .await
            .ok_or_else(|| PipelineError::Timeout {
                file_name: file_name.clone(),
                stage: "upload",
                timeout_ms: timeouts.upload_timeout_ms.unwrap_or_default(),
            })?
            .map_err(|source| PipelineError::Upload {
                file_name: file_name.clone(),
                source,
            })?;
        tracing::info!(
            file = %file_name,
            record_id = %receipt.record_id,
            owner = owner_record_id,
            "File uploaded"
        );

        Ok(ProcessedFile {
            file_name,
            data,
            passthrough,
            record_id: receipt.record_id,
        })
    }

    async fn bounded<T>(
        &self,
        limit: Option<Duration>,
        future: impl std::future::Future<Output = T>,
    ) -> Option<T> {
        with_timeout(self.timer.as_deref(), limit, future).await
    }
}
