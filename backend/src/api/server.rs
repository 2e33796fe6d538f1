//! HTTP server for the image batch API.
//!
//! # API Endpoints
//!
//! | Method | Path                   | Description                              |
//! |--------|------------------------|------------------------------------------|
//! | GET    | `/health`              | Health check                             |
//! | POST   | `/upload`              | Upload images (multipart, field `file`)  |
//! | GET    | `/preview/{filename}`  | Stored image, inline                     |
//! | GET    | `/download/{filename}` | Stored image or archive, as attachment   |
//!
//! Anything else falls through to the built frontend when `static_dir`
//! exists.

use axum::{
    extract::{multipart::MultipartError, multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use super::types::{error_response, UploadResponse};
use crate::config::ServerConfig;
use crate::error::{PipelineError, ServerError, StorageError, UploadError};
use crate::pipeline::{run_batch, PipelineOptions};
use crate::processor::{ImageProcessor, PngNormalizer};
use crate::storage::{content_type_for, download_name, UploadStore};
use crate::validation::{select_images, UploadedFile};

/// Error half of every handler: status plus `{"success": false, "error": …}`.
type Rejection = (StatusCode, Json<Value>);

/// Shared state of the handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: UploadStore,
    pub processor: Arc<dyn ImageProcessor>,
}

impl AppState {
    /// Open the upload directory and use the given processor.
    pub fn new(config: ServerConfig, processor: Arc<dyn ImageProcessor>) -> Result<Self, StorageError> {
        let store = UploadStore::open(&config.upload_dir)?;
        Ok(Self {
            config: Arc::new(config),
            store,
            processor,
        })
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let body_limit = state.config.body_limit();
    let static_dir = state.config.static_dir.clone().filter(|dir| dir.is_dir());

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload))
        .route("/preview/{filename}", get(preview))
        .route("/download/{filename}", get(download));

    app = match static_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "serving frontend");
            app.fallback_service(ServeDir::new(dir))
        }
        None => app.route("/", get(health)),
    };

    app.layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server with the default processor.
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    start_server_with(config, Arc::new(PngNormalizer)).await
}

/// Start the HTTP server with a custom processor.
pub async fn start_server_with(
    config: ServerConfig,
    processor: Arc<dyn ImageProcessor>,
) -> Result<(), Box<dyn std::error::Error>> {
    let port = config.port;
    let state = AppState::new(config, processor)?;

    spawn_cleanup_task(
        state.store.clone(),
        state.config.cleanup_interval,
        state.config.retention,
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("🚀 Image batch server running on http://localhost:{}", port);
    tracing::info!("   POST /upload               - Upload images");
    tracing::info!("   GET  /preview/{{filename}}   - Inline preview");
    tracing::info!("   GET  /download/{{filename}}  - Download result");
    tracing::info!("   GET  /health               - Health check");
    tracing::info!(
        upload_dir = %state.store.root().display(),
        workers = state.config.effective_workers(),
        max_total_mb = state.config.max_total_size_mb(),
        processor = state.processor.name(),
        "configuration"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

/// Purge old files from the upload directory every `every`.
pub fn spawn_cleanup_task(store: UploadStore, every: Duration, retention: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + every;
        let mut ticker = tokio::time::interval_at(start, every);
        loop {
            ticker.tick().await;
            let pass_store = store.clone();
            match tokio::task::spawn_blocking(move || pass_store.cleanup(retention)).await {
                Ok(Ok(report)) => {
                    tracing::info!(removed = report.removed.len(), failed = report.failed, "upload cleanup")
                }
                Ok(Err(e)) => tracing::error!(error = %e, "upload cleanup failed"),
                Err(e) => tracing::error!(error = %e, "upload cleanup task panicked"),
            }
        }
    })
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "imagebatch",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /upload",
            "preview": "GET /preview/{filename}",
            "download": "GET /download/{filename}"
        }
    }))
}

/// Upload endpoint: validate, process, answer single or bulk.
async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, Rejection> {
    let limit_mb = state.config.max_total_size_mb();

    let multipart = multipart.map_err(|e| {
        tracing::warn!(error = %e, "upload without multipart body");
        reject(UploadError::NoFile.into())
    })?;

    let files = read_files(multipart, limit_mb).await.map_err(|e| reject(e.into()))?;
    tracing::info!(parts = files.len(), "📄 new upload");

    let batch = select_images(files, state.config.max_total_size).map_err(|e| reject(e.into()))?;

    let options = PipelineOptions {
        workers: state.config.effective_workers(),
    };
    let outcome = run_batch(&state.store, Arc::clone(&state.processor), batch, &options)
        .await
        .map_err(|e| reject(e.into()))?;

    Ok(Json(outcome.into()))
}

/// Collect every `file` part of the request.
async fn read_files(mut multipart: Multipart, limit_mb: u64) -> Result<Vec<UploadedFile>, UploadError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(e, limit_mb))? {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit_mb))?;
        files.push(UploadedFile::new(name, bytes.to_vec()));
    }

    Ok(files)
}

fn multipart_error(e: MultipartError, limit_mb: u64) -> UploadError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::PayloadTooLarge { limit_mb }
    } else {
        UploadError::Multipart(e.body_text())
    }
}

/// Serve a stored file inline.
async fn preview(State(state): State<AppState>, Path(filename): Path<String>) -> Result<Response, Rejection> {
    let (name, bytes) = read_stored(&state, &filename).await?;
    Ok(([(header::CONTENT_TYPE, content_type_for(&name).to_string())], bytes).into_response())
}

/// Serve a stored file as an attachment.
async fn download(State(state): State<AppState>, Path(filename): Path<String>) -> Result<Response, Rejection> {
    let (name, bytes) = read_stored(&state, &filename).await?;
    let disposition = format!("attachment; filename=\"{}\"", download_name(&name));
    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&name).to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

async fn read_stored(state: &AppState, requested: &str) -> Result<(String, Vec<u8>), Rejection> {
    let (name, path) = state.store.resolve(requested).map_err(|e| match e {
        StorageError::NotFound(name) => reject(ServerError::NotFound(name)),
        other => reject(ServerError::Internal(other.to_string())),
    })?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| reject(ServerError::Internal(e.to_string())))?;
    Ok((name, bytes))
}

/// HTTP status of an error.
fn status_of(err: &ServerError) -> StatusCode {
    match err {
        ServerError::Upload(UploadError::PayloadTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
        ServerError::Upload(_) => StatusCode::BAD_REQUEST,
        ServerError::Pipeline(PipelineError::EmptyInput) => StatusCode::BAD_REQUEST,
        ServerError::Pipeline(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ServerError::NotFound(_) => StatusCode::NOT_FOUND,
    }
}

fn reject(err: ServerError) -> Rejection {
    let status = status_of(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "❌ request failed");
    } else {
        tracing::warn!(error = %err, "request rejected");
    }
    (status, Json(error_response(&err.to_string())))
}
