//! Pipeline configuration.
//!
//! `ResizeSpec` is built once per pipeline and shared read-only across every
//! file in a batch. Its fields are private so that the only ways to obtain
//! one (`ResizeSpec::new`, `Default`, serde) all pass through validation.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::decode::FilterType;
use crate::error::ConfigError;

/// Longest edge, in pixels, an uploaded image may have.
pub const DEFAULT_MAX_DIMENSION: u32 = 2048;

/// Default lossy-encoder quality factor.
pub const DEFAULT_QUALITY: f32 = 0.75;

/// Default output encoding.
pub const DEFAULT_OUTPUT_FORMAT: OutputFormat = OutputFormat::Jpeg;

/// Output encodings the transform stage can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum OutputFormat {
    /// Lossy photographic encoding; honours the quality factor.
    Jpeg,
    /// Lossless encoding; the quality factor is ignored.
    Png,
}

impl OutputFormat {
    /// Parse a MIME type such as `image/jpeg` (case-insensitive).
    pub fn from_mime(mime: &str) -> Result<Self, ConfigError> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(OutputFormat::Jpeg),
            "image/png" => Ok(OutputFormat::Png),
            _ => Err(ConfigError::UnsupportedFormat(mime.to_string())),
        }
    }

    /// Canonical MIME type of the encoded output.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    /// Whether encoding discards information according to the quality factor.
    pub fn is_lossy(self) -> bool {
        matches!(self, OutputFormat::Jpeg)
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        DEFAULT_OUTPUT_FORMAT
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_mime(s)
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_mime(&value)
    }
}

impl From<OutputFormat> for &'static str {
    fn from(format: OutputFormat) -> Self {
        format.mime_type()
    }
}

/// Immutable resize/encode parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ResizeSpecFields", into = "ResizeSpecFields")]
pub struct ResizeSpec {
    max_dimension: u32,
    quality: f32,
    output_format: OutputFormat,
    filter: FilterType,
}

impl ResizeSpec {
    /// Build a validated spec using the default (bilinear) resampling filter.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMaxDimension` if `max_dimension` is zero and
    /// `ConfigError::InvalidQuality` if `quality` is not a finite value in (0, 1].
    pub fn new(
        max_dimension: u32,
        quality: f32,
        output_format: OutputFormat,
    ) -> Result<Self, ConfigError> {
        if max_dimension == 0 {
            return Err(ConfigError::InvalidMaxDimension(max_dimension));
        }
        if !quality.is_finite() || quality <= 0.0 || quality > 1.0 {
            return Err(ConfigError::InvalidQuality(quality));
        }
        Ok(Self {
            max_dimension,
            quality,
            output_format,
            filter: FilterType::default(),
        })
    }

    /// Replace the resampling filter.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }
}

impl Default for ResizeSpec {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            quality: DEFAULT_QUALITY,
            output_format: DEFAULT_OUTPUT_FORMAT,
            filter: FilterType::default(),
        }
    }
}

/// Unvalidated serde shape of `ResizeSpec`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ResizeSpecFields {
    max_dimension: u32,
    quality: f32,
    output_format: OutputFormat,
    filter: FilterType,
}

impl Default for ResizeSpecFields {
    fn default() -> Self {
        ResizeSpec::default().into()
    }
}

impl TryFrom<ResizeSpecFields> for ResizeSpec {
    type Error = ConfigError;

    fn try_from(fields: ResizeSpecFields) -> Result<Self, Self::Error> {
        Ok(ResizeSpec::new(fields.max_dimension, fields.quality, fields.output_format)?
            .with_filter(fields.filter))
    }
}

impl From<ResizeSpec> for ResizeSpecFields {
    fn from(spec: ResizeSpec) -> Self {
        Self {
            max_dimension: spec.max_dimension,
            quality: spec.quality,
            output_format: spec.output_format,
            filter: spec.filter,
        }
    }
}

/// Optional time limits for the asynchronous stages.
///
/// Decode, rasterize and encode run synchronously on the caller's thread and
/// cannot be interrupted, so only the payload read and the upload are bounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StageTimeouts {
    /// Limit for reading a file's byte payload, in milliseconds.
    pub read_timeout_ms: Option<u64>,
    /// Limit for the external record creation, in milliseconds.
    pub upload_timeout_ms: Option<u64>,
}

impl StageTimeouts {
    pub fn read(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    pub fn upload(&self) -> Option<Duration> {
        self.upload_timeout_ms.map(Duration::from_millis)
    }

    /// Whether any stage has a limit configured.
    pub fn any(&self) -> bool {
        self.read_timeout_ms.is_some() || self.upload_timeout_ms.is_some()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.read_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidTimeout { stage: "read" });
        }
        if self.upload_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidTimeout { stage: "upload" });
        }
        Ok(())
    }
}

/// Complete pipeline configuration, as accepted from a caller.
///
/// Serialized flat, e.g. `{ "maxDimension": 1024, "quality": 0.8,
/// "uploadTimeoutMs": 30000 }`; every field is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(flatten)]
    pub resize: ResizeSpec,
    #[serde(flatten)]
    pub timeouts: StageTimeouts,
}

impl PipelineConfig {
    /// Check invariants not already enforced by `ResizeSpec` construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timeouts.validate()
    }
}
