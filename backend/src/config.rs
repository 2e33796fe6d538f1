//! Server configuration.
//!
//! Defaults mirror the limits the browser client enforces. Every field can
//! be overridden from the CLI or the matching `IMAGEBATCH_*` variable
//! (a `.env` file is loaded first).

use std::path::PathBuf;
use std::time::Duration;

/// Maximum cumulative size of the accepted images of one request.
pub const DEFAULT_MAX_TOTAL_SIZE: u64 = 500 * 1024 * 1024;

/// Room for multipart boundaries and headers on top of the image bytes.
pub const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

/// Parallel workers for bulk processing.
pub const DEFAULT_WORKERS: usize = 8;

/// Upload directory, relative to the working directory.
pub const DEFAULT_UPLOAD_DIR: &str = "static/uploads";

/// Built frontend, served at `/` when present.
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist";

pub const DEFAULT_PORT: u16 = 5000;

/// Stored files older than this are purged.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(60 * 60);

pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Runtime settings of the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub upload_dir: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub max_total_size: u64,
    pub workers: usize,
    pub retention: Duration,
    pub cleanup_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            static_dir: Some(PathBuf::from(DEFAULT_STATIC_DIR)),
            max_total_size: DEFAULT_MAX_TOTAL_SIZE,
            workers: DEFAULT_WORKERS,
            retention: DEFAULT_RETENTION,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

impl ServerConfig {
    /// Limit in whole megabytes, as shown in error messages.
    pub fn max_total_size_mb(&self) -> u64 {
        self.max_total_size / (1024 * 1024)
    }

    /// Request body limit handed to axum.
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.max_total_size.saturating_add(MULTIPART_OVERHEAD)).unwrap_or(usize::MAX)
    }

    /// At least one worker, whatever was configured.
    pub fn effective_workers(&self) -> usize {
        self.workers.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.max_total_size, 524_288_000);
        assert_eq!(config.max_total_size_mb(), 500);
        assert_eq!(config.workers, 8);
        assert_eq!(config.retention, Duration::from_secs(3600));
        assert_eq!(config.body_limit() as u64, 524_288_000 + MULTIPART_OVERHEAD);
    }

    #[test]
    fn test_zero_workers_still_runs() {
        let config = ServerConfig { workers: 0, ..ServerConfig::default() };
        assert_eq!(config.effective_workers(), 1);
    }
}
