use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationReport;

/// The main error type for regionkit operations.
#[derive(Debug, Error)]
pub enum RegionKitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("The image file was not found at {path}")]
    ImageNotFound { path: PathBuf },

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image {path}: {source}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid hex color '{input}': {reason}")]
    InvalidHexColor { input: String, reason: String },

    #[error("Unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("Invalid region at index {index}: {message}")]
    InvalidRegion { index: usize, message: String },

    #[error(
        "Annotation arrays differ in length: {boxes} box(es), {labels} label(s), {confidences} confidence(s)"
    )]
    LengthMismatch {
        boxes: usize,
        labels: usize,
        confidences: usize,
    },

    #[error("Font error: {0}")]
    Font(String),

    #[error("Frame sequence is empty")]
    EmptyFrameSequence,

    #[error("Frame {index} is {actual:?} but the sequence started at {expected:?}")]
    FrameSizeMismatch {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Video encoder failed: {0}")]
    Encoder(String),

    #[error("Failed to parse detections {path}: {message}")]
    InvalidDetections { path: PathBuf, message: String },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },
}
