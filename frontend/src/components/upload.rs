//! Image drop zone with drag & drop and file picker support.
//!
//! Turns browser `FileList`s into [`Candidate`]s and hands them to the
//! session; validation happens there.

use leptos::*;
use web_sys::{DragEvent, Event, File, FileList, HtmlInputElement};

use crate::config::ACCEPT_ATTRIBUTE;
use crate::controller::{Controller, FILE_INPUT_ID};
use crate::services::AnimationEvent;
use crate::session::Msg;
use crate::types::Candidate;

/// Collect the files of a `FileList` as candidates, in list order.
fn candidates_from(files: &FileList) -> Vec<Candidate<File>> {
    (0..files.length())
        .filter_map(|i| files.get(i))
        .map(|file| Candidate::new(file.name(), file.size() as u64, file))
        .collect()
}

#[component]
pub fn UploadSection(controller: Controller) -> impl IntoView {
    let (drag_over, set_drag_over) = create_signal(false);

    // Handler pour le changement de fichier
    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);

        if let Some(files) = input.files() {
            let candidates = candidates_from(&files);
            if !candidates.is_empty() {
                log::info!("📂 {} file(s) picked", candidates.len());
                controller.dispatch(Msg::FilesChosen(candidates));
            }
        }
        // Allow picking the same files again.
        input.set_value("");
    };

    let on_drag_over = move |ev: DragEvent| {
        ev.prevent_default();
        if !drag_over.get_untracked() {
            set_drag_over.set(true);
            controller.animate(AnimationEvent::DragOver);
        }
    };

    let on_drag_leave = move |ev: DragEvent| {
        ev.prevent_default();
        set_drag_over.set(false);
        controller.animate(AnimationEvent::DragLeave);
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_drag_over.set(false);
        controller.animate(AnimationEvent::Dropped);

        if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
            let candidates = candidates_from(&files);
            log::info!("📥 {} file(s) dropped", candidates.len());
            controller.dispatch(Msg::FilesChosen(candidates));
        }
    };

    // Handler pour cliquer sur la zone entière
    let trigger_file_input = move |_| controller.open_file_picker();

    view! {
        <div
            class="upload-section"
            class:drag-over=move || drag_over.get()
            id="uploadArea"
            on:click=trigger_file_input
            on:dragover=on_drag_over
            on:dragleave=on_drag_leave
            on:drop=on_drop
        >
            <div class="upload-icon">"🖼️"</div>
            <div class="upload-text">"Drop images here"</div>
            <div class="upload-hint">"or click to browse (Ctrl+U)"</div>
            <div class="upload-hint mt-20">
                "Supported formats: JPG, PNG, WEBP, BMP, TIFF"
                <br/>
                "Up to 500MB per batch"
            </div>

            <input
                type="file"
                id=FILE_INPUT_ID
                accept=ACCEPT_ATTRIBUTE
                multiple=true
                style="display:none"
                on:click=|ev| ev.stop_propagation()
                on:change=on_file_change
            />
        </div>
    }
}
