//! HTTP API module.
//!
//! This module provides the HTTP server and API types for the image batch backend.

pub mod server;
pub mod types;

pub use server::{router, spawn_cleanup_task, start_server, start_server_with, AppState};
pub use types::*;
