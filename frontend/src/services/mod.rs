//! Browser and backend services.
//!
//! This module provides the collaborators of the upload session:
//!
//! # Services
//!
//! - [`upload`] - multipart submission to the Processing Endpoint
//! - [`theme`] - light/dark preference persisted in local storage
//! - [`animation`] - fire-and-forget visual effects

pub mod animation;
pub mod theme;
pub mod upload;

pub use animation::*;
pub use theme::*;
pub use upload::*;
