//! Selected files panel: summary, rows with remove buttons, process button.

use leptos::*;

use crate::controller::Controller;
use crate::session::Msg;
use crate::types::format_file_size;

#[component]
pub fn SelectedFiles(controller: Controller) -> impl IntoView {
    let session = controller.session;

    let rows = move || {
        session.with(|s| {
            s.files()
                .iter()
                .map(|f| (f.id, f.name.clone(), f.size))
                .collect::<Vec<_>>()
        })
    };

    let on_process = move |_| controller.dispatch(Msg::ProcessRequested);
    let on_cancel = move |_| controller.cancel();

    view! {
        <Show when=move || session.with(|s| !s.is_empty()) fallback=|| view! {}>
            <div class="selected-files" id="selectedFiles">
                <div class="files-summary">
                    <span class="files-count">
                        "🗂️ " {move || session.with(|s| s.len())} " files selected"
                    </span>
                    <span class="files-size">
                        {move || session.with(|s| format_file_size(s.total_size()))} " total"
                    </span>
                </div>

                <div class="file-list-container" id="fileList">
                    <For
                        each=rows
                        key=|(id, _, _)| *id
                        children=move |(id, name, size)| {
                            view! {
                                <div class="file-item">
                                    <span class="file-name">"🖼️ " {name}</span>
                                    <span class="file-size">"(" {format_file_size(size)} ")"</span>
                                    <button
                                        class="file-remove"
                                        title="Remove"
                                        on:click=move |_| controller.dispatch(Msg::RemoveFile(id))
                                    >
                                        "✕"
                                    </button>
                                </div>
                            }
                        }
                    />
                </div>
            </div>
        </Show>

        <div class="process-actions">
            <button
                class="btn btn-primary"
                id="processBtn"
                on:click=on_process
                disabled=move || session.with(|s| !s.can_process())
            >
                {move || session.with(|s| s.process_label())}
            </button>
            <Show when=move || session.with(|s| s.is_processing()) fallback=|| view! {}>
                <button class="btn btn-secondary" id="cancelBtn" on:click=on_cancel>
                    "Cancel"
                </button>
            </Show>
        </div>
    }
}
