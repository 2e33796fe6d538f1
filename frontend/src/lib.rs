//! Image Batch - Frontend Rust/Leptos Application
//!
//! A WebAssembly page for uploading batches of images to the processing
//! backend and downloading the results.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (theme toggle)                                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title, description)                              │
//! │  ├── UploadSection (drop zone, picker)                      │
//! │  ├── SelectedFiles (selection, process button)              │
//! │  ├── ProgressSection (while processing)                     │
//! │  └── ResultsSection (after success)                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer · NotificationToast                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Common types (PendingFile, UploadResult, Notice, etc.)
//! - [`session`] - Pure upload session state machine
//! - [`controller`] - Executes session effects against the page
//! - [`components`] - UI components (Header, Upload, Results, etc.)
//! - [`services`] - Backend communication, theme store, animations

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod session;
pub mod controller;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Selection
    Candidate, FileId, PendingFile,
    // Notices
    Notice, NoticeLevel,
    // API
    UploadResult,
    // Errors
    AppError, AppResult,
};

// Session
pub use session::{update, Effect, KeyChord, Msg, SessionState};
pub use controller::Controller;

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 Image Batch - Starting Leptos App");

    // Mount the application
    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=APP_NAME/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    // Global state for the page
    let controller = Controller::new();

    // Theme is read once at startup
    let initial_theme = load_theme(&LocalStorageThemeStore);
    apply_theme(initial_theme);
    let (theme, set_theme) = create_signal(initial_theme);

    // Keyboard shortcuts: Ctrl/Cmd+U opens the picker, Escape clears
    let shortcuts = window_event_listener(ev::keydown, move |ev| {
        let chord = KeyChord::new(ev.key(), ev.ctrl_key(), ev.meta_key());
        if chord.opens_picker() {
            ev.prevent_default();
        }
        if chord.opens_picker() || chord.is_escape() {
            controller.dispatch(Msg::KeyPressed(chord));
        }
    });
    on_cleanup(move || shortcuts.remove());

    view! {
        <Header controller=controller theme=theme set_theme=set_theme/>

        <div class="container">
            <Hero/>
            <UploadSection controller=controller/>
            <SelectedFiles controller=controller/>
            <ProgressSection controller=controller/>
            <ResultsSection controller=controller/>
        </div>

        <NotificationToast controller=controller/>
        <Footer/>
    }
}
