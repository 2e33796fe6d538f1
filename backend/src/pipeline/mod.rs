//! Single and bulk processing of a validated upload.
//!
//! ```text
//! ValidatedBatch ──▶ save inputs ──┬─ 1 file ──▶ processed_{uuid}.png  (input kept for preview)
//!                                  └─ n files ─▶ batch_{hex}.zip       (inputs removed)
//! ```
//!
//! Bulk processing runs the processor on blocking worker threads, at most
//! `workers` at a time. Archive entries keep the upload order. A bulk image
//! that fails is skipped; a single image that fails fails the request.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use imagebatch::{run_batch, select_images, PipelineOptions, PngNormalizer, UploadStore};
//!
//! let store = UploadStore::open("static/uploads")?;
//! let batch = select_images(files, 500 * 1024 * 1024)?;
//! let outcome = run_batch(&store, Arc::new(PngNormalizer), batch, &PipelineOptions::default()).await?;
//! println!("{}", outcome.output_file());
//! ```

use futures::stream::{self, StreamExt};
use std::sync::Arc;

use crate::config::DEFAULT_WORKERS;
use crate::error::{PipelineError, PipelineResult, ProcessError, ProcessResult, StorageError, StorageResult};
use crate::processor::ImageProcessor;
use crate::storage::{archive_entry_name, new_archive_name, new_processed_name, UploadStore};
use crate::validation::{UploadedFile, ValidatedBatch};

/// Options for [`run_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Images processed concurrently in bulk mode
    pub workers: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { workers: DEFAULT_WORKERS }
    }
}

/// What a processed upload produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Single {
        /// Stored input, kept so it can be previewed
        original_file: String,
        output_file: String,
    },
    Bulk {
        output_file: String,
        /// Valid images in the request
        file_count: usize,
        /// Images that made it into the archive
        processed: usize,
        /// Bytes of the valid images
        total_size: u64,
    },
}

impl BatchOutcome {
    pub fn output_file(&self) -> &str {
        match self {
            BatchOutcome::Single { output_file, .. } | BatchOutcome::Bulk { output_file, .. } => output_file,
        }
    }

    pub fn file_count(&self) -> usize {
        match self {
            BatchOutcome::Single { .. } => 1,
            BatchOutcome::Bulk { file_count, .. } => *file_count,
        }
    }
}

/// Process a validated upload into a single PNG or a zip archive.
pub async fn run_batch(
    store: &UploadStore,
    processor: Arc<dyn ImageProcessor>,
    batch: ValidatedBatch,
    options: &PipelineOptions,
) -> PipelineResult<BatchOutcome> {
    let total_size = batch.total_size;
    let mut files = batch.files;

    if files.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    if files.len() == 1 {
        let file = files.remove(0);
        return process_single(store, processor, file).await;
    }

    let file_count = files.len();
    tracing::info!(files = file_count, total_size, processor = processor.name(), "bulk processing started");

    let saved = save_inputs(store, files).await?;
    let stored_names: Vec<String> = saved.iter().map(|(name, _)| name.clone()).collect();

    let result = build_archive(store, processor, saved, options.workers.max(1)).await;

    let cleanup_store = store.clone();
    let removal = tokio::task::spawn_blocking(move || {
        for name in &stored_names {
            cleanup_store.remove(name);
        }
    })
    .await;
    if let Err(e) = removal {
        tracing::warn!(error = %e, "input cleanup task failed");
    }

    let (output_file, processed) = result?;
    tracing::info!(processed, total = file_count, archive = %output_file, "bulk processing finished");

    Ok(BatchOutcome::Bulk {
        output_file,
        file_count,
        processed,
        total_size,
    })
}

/// One image: keep the input, write `processed_{uuid}.png`.
async fn process_single(
    store: &UploadStore,
    processor: Arc<dyn ImageProcessor>,
    file: UploadedFile,
) -> PipelineResult<BatchOutcome> {
    tracing::info!(file = %file.name, size = file.size(), processor = processor.name(), "single image processing started");

    let mut saved = save_inputs(store, vec![file]).await?;
    let (original_file, bytes) = saved.remove(0);

    let processed = match run_processor(processor, bytes).await {
        Ok(png) => png,
        Err(e) => {
            tracing::error!(file = %original_file, error = %e, "image processing failed");
            store.remove(&original_file);
            return Err(PipelineError::SingleFailed(e));
        }
    };

    let output_file = new_processed_name();
    let writer = store.clone();
    let target = output_file.clone();
    let written = blocking(move || writer.write(&target, &processed)).await;
    if let Err(e) = written {
        store.remove(&original_file);
        return Err(e.into());
    }

    tracing::info!(input = %original_file, output = %output_file, "single image processed");
    Ok(BatchOutcome::Single {
        original_file,
        output_file,
    })
}

/// Write every input to the store. On failure the already written ones are removed.
async fn save_inputs(store: &UploadStore, files: Vec<UploadedFile>) -> StorageResult<Vec<(String, Vec<u8>)>> {
    let store = store.clone();
    blocking(move || {
        let mut saved: Vec<(String, Vec<u8>)> = Vec::with_capacity(files.len());
        for file in files {
            match store.save_input(&file.name, &file.bytes) {
                Ok(name) => saved.push((name, file.bytes)),
                Err(e) => {
                    for (name, _) in &saved {
                        store.remove(name);
                    }
                    return Err(e);
                }
            }
        }
        Ok(saved)
    })
    .await
}

/// Process inputs in parallel and zip the successes. Returns the archive
/// name and how many images it holds.
async fn build_archive(
    store: &UploadStore,
    processor: Arc<dyn ImageProcessor>,
    inputs: Vec<(String, Vec<u8>)>,
    workers: usize,
) -> PipelineResult<(String, usize)> {
    let total = inputs.len();

    let results: Vec<(String, ProcessResult<Vec<u8>>)> = stream::iter(inputs)
        .map(|(name, bytes)| {
            let processor = Arc::clone(&processor);
            async move {
                let result = run_processor(processor, bytes).await;
                (name, result)
            }
        })
        .buffered(workers)
        .collect()
        .await;

    let mut entries = Vec::with_capacity(total);
    for (name, result) in results {
        match result {
            Ok(png) => entries.push((archive_entry_name(&name), png)),
            Err(e) => tracing::warn!(file = %name, error = %e, "skipping image"),
        }
    }

    let processed = entries.len();
    tracing::info!("Successfully processed {}/{} images", processed, total);
    if processed == 0 {
        tracing::warn!("no image could be processed, archive is empty");
    }

    let archive_name = new_archive_name();
    let writer = store.clone();
    let target = archive_name.clone();
    blocking(move || writer.write_archive(&target, &entries)).await?;

    Ok((archive_name, processed))
}

/// Run the processor on a blocking thread.
async fn run_processor(processor: Arc<dyn ImageProcessor>, bytes: Vec<u8>) -> ProcessResult<Vec<u8>> {
    tokio::task::spawn_blocking(move || processor.process(&bytes))
        .await
        .map_err(|e| ProcessError::Worker(e.to_string()))?
}

/// Run blocking storage work off the async threads.
async fn blocking<T, F>(f: F) -> StorageResult<T>
where
    F: FnOnce() -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::Io(std::io::Error::other(e.to_string())))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::tests::sample_image;
    use crate::processor::PngNormalizer;
    use image::ImageFormat;
    use std::fs::File;
    use tempfile::TempDir;

    /// Fails on inputs starting with `bad`.
    struct Picky;

    impl ImageProcessor for Picky {
        fn name(&self) -> &str {
            "picky"
        }

        fn process(&self, input: &[u8]) -> ProcessResult<Vec<u8>> {
            if input.starts_with(b"bad") {
                Err(ProcessError::Decode("bad input".into()))
            } else {
                Ok(input.to_vec())
            }
        }
    }

    fn store() -> (TempDir, UploadStore) {
        let dir = TempDir::new().unwrap();
        let store = UploadStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn batch(files: Vec<UploadedFile>) -> ValidatedBatch {
        let total_size = files.iter().map(UploadedFile::size).sum();
        ValidatedBatch { files, total_size }
    }

    fn stored_files(store: &UploadStore) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(store.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_single_keeps_original_for_preview() {
        let (_dir, store) = store();
        let input = UploadedFile::new("cat.bmp", sample_image(ImageFormat::Bmp));

        let outcome = run_batch(&store, Arc::new(PngNormalizer), batch(vec![input]), &PipelineOptions::default())
            .await
            .unwrap();

        let BatchOutcome::Single { original_file, output_file } = &outcome else {
            panic!("expected single outcome, got {:?}", outcome);
        };
        assert!(original_file.ends_with("_cat.bmp"));
        assert!(output_file.starts_with("processed_"));
        assert!(store.path_of(original_file).is_file());

        let png = std::fs::read(store.path_of(output_file)).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
        assert_eq!(outcome.file_count(), 1);
    }

    #[tokio::test]
    async fn test_single_failure_removes_input() {
        let (_dir, store) = store();
        let input = UploadedFile::new("broken.png", b"bad data".to_vec());

        let err = run_batch(&store, Arc::new(Picky), batch(vec![input]), &PipelineOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::SingleFailed(_)));
        assert_eq!(err.to_string(), "Failed to process image");
        assert!(stored_files(&store).is_empty());
    }

    #[tokio::test]
    async fn test_bulk_skips_failures_and_keeps_order() {
        let (_dir, store) = store();
        let files = vec![
            UploadedFile::new("one.png", b"first".to_vec()),
            UploadedFile::new("two.png", b"bad second".to_vec()),
            UploadedFile::new("three.jpg", b"third".to_vec()),
        ];

        let outcome = run_batch(&store, Arc::new(Picky), batch(files), &PipelineOptions { workers: 2 })
            .await
            .unwrap();

        let BatchOutcome::Bulk { output_file, file_count, processed, total_size } = &outcome else {
            panic!("expected bulk outcome, got {:?}", outcome);
        };
        assert_eq!(*file_count, 3);
        assert_eq!(*processed, 2);
        assert_eq!(*total_size, 20);

        // Only the archive is left behind.
        assert_eq!(stored_files(&store), vec![output_file.clone()]);

        let mut archive = zip::ZipArchive::new(File::open(store.path_of(output_file)).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names[0].ends_with("_one_no_bg.png"));
        assert!(names[1].ends_with("_three_no_bg.png"));
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let (_dir, store) = store();
        let err = run_batch(&store, Arc::new(Picky), batch(vec![]), &PipelineOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
    }
}
