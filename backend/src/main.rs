//! Image Batch CLI - bulk image processing server and tools
//!
//! # Commands
//!
//! ```bash
//! imagebatch serve                        # Start HTTP server (port 5000)
//! imagebatch process a.jpg b.png -o out   # Process images locally (PNG or ZIP)
//! imagebatch cleanup --max-age-secs 0     # Purge the upload directory once
//! ```
//!
//! Every option of `serve` and `cleanup` can also be set through the
//! matching `IMAGEBATCH_*` environment variable or a `.env` file.

use clap::{Parser, Subcommand};
use imagebatch::config::{DEFAULT_PORT, DEFAULT_STATIC_DIR, DEFAULT_UPLOAD_DIR, DEFAULT_WORKERS};
use imagebatch::{
    run_batch, select_images, BatchOutcome, PipelineOptions, PngNormalizer, ServerConfig, UploadStore,
    UploadedFile,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "imagebatch")]
#[command(about = "Process bulk image uploads into PNG files and ZIP archives", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "IMAGEBATCH_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Directory for uploads and results
        #[arg(long, env = "IMAGEBATCH_UPLOAD_DIR", default_value = DEFAULT_UPLOAD_DIR)]
        upload_dir: PathBuf,

        /// Built frontend served at `/` (skipped if missing)
        #[arg(long, env = "IMAGEBATCH_STATIC_DIR", default_value = DEFAULT_STATIC_DIR)]
        static_dir: PathBuf,

        /// Images processed in parallel for bulk uploads
        #[arg(short, long, env = "IMAGEBATCH_WORKERS", default_value_t = DEFAULT_WORKERS)]
        workers: usize,

        /// Maximum total size of one upload, in MB
        #[arg(long, env = "IMAGEBATCH_MAX_TOTAL_MB", default_value = "500")]
        max_total_mb: u64,

        /// Age after which stored files are deleted, in seconds
        #[arg(long, env = "IMAGEBATCH_RETENTION_SECS", default_value = "3600")]
        retention_secs: u64,
    },

    /// Process images locally: one image gives a PNG, several give a ZIP
    Process {
        /// Input images
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (default: generated name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Images processed in parallel
        #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,

        /// Scratch directory for intermediate files
        #[arg(long, env = "IMAGEBATCH_UPLOAD_DIR", default_value = DEFAULT_UPLOAD_DIR)]
        work_dir: PathBuf,
    },

    /// Delete old files from the upload directory once
    Cleanup {
        /// Directory to clean
        #[arg(long, env = "IMAGEBATCH_UPLOAD_DIR", default_value = DEFAULT_UPLOAD_DIR)]
        upload_dir: PathBuf,

        /// Delete files older than this, in seconds
        #[arg(long, default_value = "3600")]
        max_age_secs: u64,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    imagebatch::logging::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            port,
            upload_dir,
            static_dir,
            workers,
            max_total_mb,
            retention_secs,
        } => {
            let config = ServerConfig {
                port,
                upload_dir,
                static_dir: Some(static_dir),
                max_total_size: max_total_mb.saturating_mul(1024 * 1024),
                workers,
                retention: Duration::from_secs(retention_secs),
                ..ServerConfig::default()
            };
            cmd_serve(config).await
        }

        Commands::Process {
            inputs,
            output,
            workers,
            work_dir,
        } => cmd_process(&inputs, output.as_deref(), workers, &work_dir).await,

        Commands::Cleanup {
            upload_dir,
            max_age_secs,
        } => cmd_cleanup(&upload_dir, Duration::from_secs(max_age_secs)),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    imagebatch::server::start_server(config).await
}

async fn cmd_process(
    inputs: &[PathBuf],
    output: Option<&Path>,
    workers: usize,
    work_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut files = Vec::with_capacity(inputs.len());
    for input in inputs {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push(UploadedFile::new(name, fs::read(input)?));
    }

    let defaults = ServerConfig::default();
    let batch = select_images(files, defaults.max_total_size)?;
    eprintln!("📄 Processing {} of {} file(s)", batch.files.len(), inputs.len());

    let store = UploadStore::open(work_dir)?;
    let options = PipelineOptions { workers };
    let outcome = run_batch(&store, Arc::new(PngNormalizer), batch, &options).await?;

    let produced = store.path_of(outcome.output_file());
    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(outcome.output_file()));
    fs::copy(&produced, &target)?;
    store.remove(outcome.output_file());

    match &outcome {
        BatchOutcome::Single { original_file, .. } => {
            store.remove(original_file);
            eprintln!("✅ Processed 1 image");
        }
        BatchOutcome::Bulk {
            file_count,
            processed,
            ..
        } => {
            eprintln!("✅ Processed {}/{} images", processed, file_count);
        }
    }
    eprintln!("💾 Output written to: {}", target.display());

    Ok(())
}

fn cmd_cleanup(upload_dir: &Path, max_age: Duration) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🧹 Cleaning: {}", upload_dir.display());

    let store = UploadStore::open(upload_dir)?;
    let report = store.cleanup(max_age)?;

    eprintln!("   Removed: {}", report.removed.len());
    if report.failed > 0 {
        eprintln!("   ⚠️  Failed: {}", report.failed);
    }

    Ok(())
}
