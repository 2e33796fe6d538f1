//! Error types for the image batch backend.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`ProcessError`] - decoding/encoding a single image
//! - [`StorageError`] - upload directory and archive I/O
//! - [`UploadError`] - rejected upload requests
//! - [`PipelineError`] - single/bulk orchestration
//! - [`ServerError`] - top-level HTTP errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Image Processing Errors
// =============================================================================

/// Errors while processing one image.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Input bytes are not a supported image.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Output could not be encoded.
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// The worker running the processor died.
    #[error("Processing worker failed: {0}")]
    Worker(String),
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors from the upload directory.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error.
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive creation failed.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Requested file does not exist.
    #[error("File not found: {0}")]
    NotFound(String),
}

// =============================================================================
// Upload Validation Errors
// =============================================================================

/// Reasons an upload request is refused before any processing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    /// No `file` part in the request.
    #[error("No file selected")]
    NoFile,

    /// Only unsupported or empty-named files.
    #[error("No valid images selected. Supported formats: JPG, PNG, WEBP, BMP, TIFF")]
    NoValidFiles,

    /// Accepted files add up to more than the limit.
    #[error("Total file size exceeds {limit_mb}MB limit")]
    TotalTooLarge { limit_mb: u64 },

    /// The request body itself is over the limit.
    #[error("File too large. Maximum size is {limit_mb}MB")]
    PayloadTooLarge { limit_mb: u64 },

    /// Malformed multipart body.
    #[error("Multipart error: {0}")]
    Multipart(String),
}

// =============================================================================
// Pipeline Errors
// =============================================================================

/// Errors of the single/bulk pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Storage error.
    #[error("Processing error: {0}")]
    Storage(#[from] StorageError),

    /// The only image of a single upload could not be processed.
    #[error("Failed to process image")]
    SingleFailed(#[source] ProcessError),

    /// Nothing to process.
    #[error("No images to process")]
    EmptyInput,
}

// =============================================================================
// Server Errors (top-level)
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Upload rejected.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Pipeline error.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Unknown preview/download name.
    #[error("File not found: {0}")]
    NotFound(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for image processing.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // StorageError -> PipelineError -> ServerError
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let pipeline_err: PipelineError = StorageError::from(io).into();
        assert!(pipeline_err.to_string().starts_with("Processing error:"));
        assert!(pipeline_err.to_string().contains("disk full"));

        let server_err: ServerError = pipeline_err.into();
        assert!(server_err.to_string().contains("disk full"));
    }

    #[test]
    fn test_upload_messages_match_client_expectations() {
        assert_eq!(UploadError::NoFile.to_string(), "No file selected");
        assert_eq!(
            UploadError::TotalTooLarge { limit_mb: 500 }.to_string(),
            "Total file size exceeds 500MB limit"
        );
        assert_eq!(
            UploadError::PayloadTooLarge { limit_mb: 500 }.to_string(),
            "File too large. Maximum size is 500MB"
        );

        let server_err: ServerError = UploadError::NoValidFiles.into();
        assert!(server_err.to_string().starts_with("No valid images selected"));
    }

    #[test]
    fn test_single_failure_hides_decoder_detail() {
        let err = PipelineError::SingleFailed(ProcessError::Decode("bad header".into()));
        assert_eq!(err.to_string(), "Failed to process image");
    }
}
