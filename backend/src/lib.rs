//! # Image Batch - processing endpoint for bulk image uploads
//!
//! Receives one or many images from the browser page, runs each one through
//! an [`ImageProcessor`] and answers with a single PNG or a ZIP archive that
//! the page previews and downloads.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  multipart  │────▶│ Validation  │────▶│  Pipeline   │────▶│ PNG / ZIP   │
//! │ POST /upload│     │ (ext, size) │     │ (n workers) │     │ /download   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use imagebatch::{ServerConfig, server::start_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     imagebatch::logging::init();
//!     start_server(ServerConfig::default()).await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Server settings and defaults
//! - [`validation`] - Accepted formats, name hygiene, size limit
//! - [`storage`] - Upload directory and cleanup
//! - [`processor`] - Image processor trait and PNG normalizer
//! - [`pipeline`] - Single and bulk processing
//! - [`api`] - HTTP API server
//! - [`logging`] - Tracing subscriber setup

// Core modules
pub mod config;
pub mod error;

// Request handling
pub mod validation;
pub mod storage;

// Processing
pub mod processor;
pub mod pipeline;

// HTTP API
pub mod api;

pub mod logging;

// =============================================================================
// Re-exports - Errors and configuration
// =============================================================================

pub use config::ServerConfig;
pub use error::{PipelineError, ProcessError, ServerError, StorageError, UploadError};

// =============================================================================
// Re-exports - Validation and storage
// =============================================================================

pub use validation::{allowed_file, sanitize_filename, select_images, UploadedFile, ValidatedBatch, ALLOWED_EXTENSIONS};
pub use storage::{CleanupReport, UploadStore};

// =============================================================================
// Re-exports - Processing
// =============================================================================

pub use processor::{ImageProcessor, PngNormalizer};
pub use pipeline::{run_batch, BatchOutcome, PipelineOptions};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, UploadResponse, UploadResult};
pub use api::AppState;

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, start_server_with};
}
