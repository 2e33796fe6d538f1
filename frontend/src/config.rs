//! Application configuration.
//!
//! Centralized configuration for the Image Batch frontend.
//! These are compile-time constants; the page is normally served by the
//! backend itself, so requests go to the same origin.

/// Backend API base URL.
///
/// Empty means same origin (`/upload`, `/preview/...`, `/download/...`).
pub const BACKEND_URL: &str = "";

/// Application name, used for the document title.
pub const APP_NAME: &str = "Image Batch";

/// Multipart field name shared by every submitted file.
pub const UPLOAD_FIELD: &str = "file";

/// Accepted image extensions (lowercase, without the dot).
pub const ACCEPTED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "bmp", "tiff"];

/// Value for the file input `accept` attribute.
pub const ACCEPT_ATTRIBUTE: &str = ".jpg,.jpeg,.png,.webp,.bmp,.tiff";

/// Maximum cumulative size of the selection (in bytes).
///
/// 500 MiB, enforced client-side only.
pub const MAX_TOTAL_SIZE: u64 = 500 * 1024 * 1024;

/// How long a notice stays visible.
pub const NOTICE_DURATION_MS: u64 = 5_000;

/// Delay between a successful result and clearing the submitted files.
pub const RESET_DELAY_MS: u64 = 5_000;

/// Upper bound on a processing request before it is aborted.
///
/// Bulk batches can take minutes server-side.
pub const REQUEST_TIMEOUT_MS: u64 = 10 * 60 * 1_000;

/// Local storage key for the theme preference.
pub const THEME_STORAGE_KEY: &str = "theme";

/// Image shown when a preview is missing or fails to load.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMjAwIiBoZWlnaHQ9IjIwMCIgdmlld0JveD0iMCAwIDIwMCAyMDAiIGZpbGw9Im5vbmUiIHhtbG5zPSJodHRwOi8vd3d3LnczLm9yZy8yMDAwL3N2ZyI+CjxyZWN0IHdpZHRoPSIyMDAiIGhlaWdodD0iMjAwIiBmaWxsPSIjRjNGNEY2Ii8+CjxwYXRoIGQ9Ik04MCA2MEgxMjBWMTIwSDgwVjYwWiIgZmlsbD0iIzlDQThBRiIvPgo8L3N2Zz4K";
