//! Upload validation: accepted image types, name hygiene and size limit.
//!
//! # Rules
//!
//! - A file is accepted when its name has an extension (text after the last
//!   `.`) in [`ALLOWED_EXTENSIONS`], compared case-insensitively.
//! - Parts with an empty filename are ignored.
//! - The accepted files together must not exceed the configured limit.
//!
//! # Example
//!
//! ```rust,ignore
//! use imagebatch::validation::{select_images, UploadedFile};
//!
//! let files = vec![
//!     UploadedFile::new("cat.JPG", vec![0; 10]),
//!     UploadedFile::new("notes.txt", vec![0; 10]),
//! ];
//! let batch = select_images(files, 500 * 1024 * 1024)?;
//! assert_eq!(batch.files.len(), 1);
//! ```

use crate::error::UploadError;

/// Extensions the endpoint accepts (lowercase, no dot).
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "bmp", "tiff"];

/// One `file` part of an upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Client-side file name
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Files that passed validation, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBatch {
    pub files: Vec<UploadedFile>,
    pub total_size: u64,
}

/// Whether `filename` carries an allowed extension.
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

/// Reduce a client-supplied name to a safe single path component.
///
/// Directory parts are dropped and anything outside `[A-Za-z0-9._-]` becomes
/// `_`, so stored names can be used verbatim in URLs.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Keep the allowed images of a request and check the size limit.
pub fn select_images(files: Vec<UploadedFile>, max_total_size: u64) -> Result<ValidatedBatch, UploadError> {
    if files.is_empty() {
        return Err(UploadError::NoFile);
    }

    let files: Vec<UploadedFile> = files
        .into_iter()
        .filter(|f| !f.name.is_empty() && allowed_file(&f.name))
        .collect();

    if files.is_empty() {
        return Err(UploadError::NoValidFiles);
    }

    let total_size: u64 = files.iter().map(UploadedFile::size).sum();
    if total_size > max_total_size {
        return Err(UploadError::TotalTooLarge {
            limit_mb: max_total_size / (1024 * 1024),
        });
    }

    Ok(ValidatedBatch { files, total_size })
}
