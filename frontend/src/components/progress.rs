use leptos::*;

use crate::controller::Controller;

#[component]
pub fn ProgressSection(controller: Controller) -> impl IntoView {
    let loading_text = controller.loading_text;
    let progress = controller.progress;

    view! {
        <Show when=move || loading_text.with(Option::is_some) fallback=|| view! {}>
            <div class="progress-section show" id="loadingSection">
                <div class="loading-text" id="loadingText">
                    {move || loading_text.get().unwrap_or_default()}
                </div>
                <div class="progress-bar">
                    <div
                        class="progress-fill"
                        id="progressBar"
                        style=move || format!("width: {:.1}%;", progress.get())
                    ></div>
                </div>
            </div>
        </Show>
    }
}
