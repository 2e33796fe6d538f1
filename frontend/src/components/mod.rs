//! UI Components for the Image Batch page.
//!
//! This module contains all Leptos components organized by function:
//!
//! # Layout Components
//! - [`Header`] - Title bar with theme toggle
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`UploadSection`] - Image drop zone and file picker
//! - [`SelectedFiles`] - Pending selection and process button
//! - [`ProgressSection`] - Simulated processing progress
//! - [`ResultsSection`] - Single or bulk result with download links
//! - [`NotificationToast`] - Single-slot notice

mod header;
mod hero;
mod upload;
mod file_list;
mod progress;
mod results;
mod notification;
mod footer;

pub use header::*;
pub use hero::*;
pub use upload::*;
pub use file_list::*;
pub use progress::*;
pub use results::*;
pub use notification::*;
pub use footer::*;
