//! Upload directory - stored inputs, processed outputs and batch archives.
//!
//! Every file lives flat in one directory and is addressed by its stored
//! name, which is always a sanitized single path component:
//!
//! | kind      | name                          |
//! |-----------|-------------------------------|
//! | input     | `{uuid}_{sanitized original}` |
//! | output    | `processed_{uuid}.png`        |
//! | archive   | `batch_{8 hex}.zip`           |
//!
//! Files are not tracked anywhere else; [`UploadStore::cleanup`] purges them
//! by modification time.

use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};
use crate::validation::sanitize_filename;

/// Outcome of one cleanup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Names of the deleted files
    pub removed: Vec<String>,
    /// Files that were due but could not be deleted
    pub failed: usize,
}

/// Flat directory holding every uploaded and generated file.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Open the store, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a stored name. The name is not checked.
    pub fn path_of(&self, stored_name: &str) -> PathBuf {
        self.root.join(stored_name)
    }

    /// Write an uploaded file under a fresh unique name and return that name.
    pub fn save_input(&self, original_name: &str, bytes: &[u8]) -> StorageResult<String> {
        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(original_name));
        fs::write(self.path_of(&stored_name), bytes)?;
        Ok(stored_name)
    }

    /// Map a client-supplied name to an existing file of the store.
    ///
    /// Only the basename is kept, so `../` tricks cannot leave the directory.
    pub fn resolve(&self, requested: &str) -> StorageResult<(String, PathBuf)> {
        let name = sanitize_filename(requested);
        let path = self.path_of(&name);
        if path.is_file() {
            Ok((name, path))
        } else {
            Err(StorageError::NotFound(name))
        }
    }

    /// Write `bytes` under `stored_name`, replacing any previous content.
    pub fn write(&self, stored_name: &str, bytes: &[u8]) -> StorageResult<PathBuf> {
        let path = self.path_of(stored_name);
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Write a deflated zip archive with one entry per `(name, bytes)` pair.
    pub fn write_archive(&self, stored_name: &str, entries: &[(String, Vec<u8>)]) -> StorageResult<PathBuf> {
        let path = self.path_of(stored_name);
        let mut zip = zip::ZipWriter::new(File::create(&path)?);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        for (name, data) in entries {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(data)?;
        }
        zip.finish()?;
        Ok(path)
    }

    /// Delete a stored file; a missing file is not an error.
    pub fn remove(&self, stored_name: &str) {
        match fs::remove_file(self.path_of(stored_name)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(file = stored_name, error = %e, "could not remove stored file"),
        }
    }

    /// Delete regular files last modified at least `max_age` ago.
    pub fn cleanup(&self, max_age: Duration) -> StorageResult<CleanupReport> {
        let now = Utc::now();
        let mut report = CleanupReport::default();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let metadata = match entry.metadata() {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            let modified: DateTime<Utc> = match metadata.modified() {
                Ok(t) => t.into(),
                Err(_) => continue,
            };
            // Clock skew can make a file look newer than now.
            let age = (now - modified).to_std().unwrap_or(Duration::ZERO);
            if age < max_age {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            match fs::remove_file(entry.path()) {
                Ok(()) => report.removed.push(name),
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "cleanup failed");
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

/// Fresh name for the output of a single upload.
pub fn new_processed_name() -> String {
    format!("processed_{}.png", Uuid::new_v4())
}

/// Fresh name for a bulk archive.
pub fn new_archive_name() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("batch_{}.zip", &id[..8])
}

/// Archive entry name for a stored input: `{stem}_no_bg.png`.
pub fn archive_entry_name(stored_name: &str) -> String {
    let stem = Path::new(stored_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| stored_name.to_string());
    format!("{}_no_bg.png", stem)
}

/// Name suggested to the browser when a stored file is downloaded.
pub fn download_name(stored_name: &str) -> String {
    if stored_name.to_lowercase().ends_with(".zip") {
        "background_removed_images.zip".to_string()
    } else {
        format!("background_removed_{}", stored_name)
    }
}

/// Content type guessed from the extension.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, e)| e.to_lowercase()).unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
