//! Common types used across the frontend application.
//!
//! This module centralizes type definitions to avoid duplication
//! and ensure consistency across components.
//!
//! # Categories
//!
//! - **Selection Types** - files chosen by the user
//! - **Notice Types** - transient notifications
//! - **API Types** - Processing Endpoint response structures
//! - **Error Types** - Frontend error handling

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ACCEPTED_EXTENSIONS;

// =============================================================================
// Selection Types
// =============================================================================

/// Stable identifier of a pending file within one session.
///
/// Never reused, so a stale view can not address the wrong file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file-{}", self.0)
    }
}

/// A file offered by the picker or a drop, before validation.
///
/// `H` is the browser handle (`web_sys::File` in the page, `()` in tests).
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate<H> {
    pub name: String,
    pub size: u64,
    pub handle: H,
}

impl<H> Candidate<H> {
    pub fn new(name: impl Into<String>, size: u64, handle: H) -> Self {
        Self { name: name.into(), size, handle }
    }
}

/// A validated file waiting to be submitted.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingFile<H> {
    /// Session-unique id
    pub id: FileId,
    /// Original file name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Lowercased suffix of the name
    pub extension: String,
    /// Browser handle used for the multipart body
    pub handle: H,
}

/// Lowercased suffix after the last `.` of a file name.
///
/// A name without a dot has an empty extension, so a file called `png` is
/// refused here just as the server refuses it.
pub fn extension_of(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Whether a lowercased extension belongs to the accepted image set.
pub fn is_accepted_extension(extension: &str) -> bool {
    ACCEPTED_EXTENSIONS.contains(&extension)
}

/// Human readable byte count (`0 Bytes`, `1.5 KB`, `12.34 MB`).
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

// =============================================================================
// Notice Types
// =============================================================================

/// Notice severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Informational message
    Info,
    /// Success/completion message
    Success,
    /// Error message
    Error,
}

impl NoticeLevel {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "notice-info",
            NoticeLevel::Success => "notice-success",
            NoticeLevel::Error => "notice-error",
        }
    }

    /// Get emoji prefix for display.
    pub fn emoji(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "ℹ️",
            NoticeLevel::Success => "✅",
            NoticeLevel::Error => "⚠️",
        }
    }
}

/// A transient notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

// =============================================================================
// API Response Types
// =============================================================================

/// Successful outcome reported by the Processing Endpoint.
///
/// The wire object also carries `"success": true`, which is checked
/// before this type is decoded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UploadResult {
    /// One image in, one image out
    Single {
        /// Stored input, if the server kept it for preview
        #[serde(default)]
        original_file: Option<String>,
        /// Processed image name
        output_file: String,
        file_count: usize,
    },
    /// Several images in, one archive out
    Bulk {
        /// Archive name
        output_file: String,
        file_count: usize,
        /// Accepted input bytes
        #[serde(default)]
        total_size: Option<u64>,
    },
}

impl UploadResult {
    /// Number of images the server processed.
    pub fn file_count(&self) -> usize {
        match self {
            UploadResult::Single { file_count, .. } | UploadResult::Bulk { file_count, .. } => {
                *file_count
            }
        }
    }

    /// Name of the downloadable artifact.
    pub fn output_file(&self) -> &str {
        match self {
            UploadResult::Single { output_file, .. } | UploadResult::Bulk { output_file, .. } => {
                output_file
            }
        }
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
///
/// Unified error type for all frontend operations.
#[derive(Clone, Debug, PartialEq)]
pub enum AppError {
    /// The endpoint answered with `success: false`.
    Upload(String),
    /// Network/HTTP error.
    Network(String),
    /// Invalid data format.
    Validation(String),
    /// The request was aborted before it settled.
    Cancelled,
    /// Browser storage unavailable or failing.
    Storage(String),
}

impl AppError {
    /// Bare message without the category prefix, as shown in notices.
    pub fn message(&self) -> String {
        match self {
            AppError::Upload(msg)
            | AppError::Network(msg)
            | AppError::Validation(msg)
            | AppError::Storage(msg) => msg.clone(),
            AppError::Cancelled => "Request cancelled".to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Upload(msg) => write!(f, "Upload error: {}", msg),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Cancelled => write!(f, "Request cancelled"),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased_last_suffix() {
        assert_eq!(extension_of("Photo.JPG"), "jpg");
        assert_eq!(extension_of("archive.tar.TIFF"), "tiff");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of("trailing."), "");
        assert!(is_accepted_extension(&extension_of("scan.Jpeg")));
        assert!(!is_accepted_extension(&extension_of("anim.gif")));
    }

    #[test]
    fn test_name_without_dot_is_not_an_image() {
        assert_eq!(extension_of("png"), "");
        assert!(!is_accepted_extension(&extension_of("png")));
        assert!(!is_accepted_extension(&extension_of("JPEG")));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(500 * 1024 * 1024), "500 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024 + 1024 * 1024 * 1024 / 4), "3.25 GB");
    }

    #[test]
    fn test_single_result_deserialization() {
        let json = r#"{
            "success": true,
            "type": "single",
            "output_file": "processed_ab12.png",
            "original_file": "ab12_cat.jpg",
            "file_count": 1
        }"#;

        let result: UploadResult = serde_json::from_str(json).unwrap();
        assert_eq!(
            result,
            UploadResult::Single {
                original_file: Some("ab12_cat.jpg".into()),
                output_file: "processed_ab12.png".into(),
                file_count: 1,
            }
        );
    }

    #[test]
    fn test_bulk_result_deserialization() {
        let json = r#"{"success": true, "type": "bulk", "output_file": "batch_1234abcd.zip", "file_count": 12, "total_size": 2048}"#;

        let result: UploadResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.file_count(), 12);
        assert_eq!(result.output_file(), "batch_1234abcd.zip");
    }

    #[test]
    fn test_single_result_without_original() {
        let json = r#"{"type": "single", "original_file": null, "output_file": "p.png", "file_count": 1}"#;
        let result: UploadResult = serde_json::from_str(json).unwrap();
        assert!(matches!(result, UploadResult::Single { original_file: None, .. }));
    }

    #[test]
    fn test_error_message_strips_category() {
        let err = AppError::Upload("Failed to process image".into());
        assert_eq!(err.message(), "Failed to process image");
        assert_eq!(err.to_string(), "Upload error: Failed to process image");
    }
}
